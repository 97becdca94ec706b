//! Static descriptors for every chat page of the console.

pub const DEFAULT_PLACEHOLDER: &str = "Digite sua mensagem para o sistema...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentConfig {
    pub key: &'static str,
    /// Page heading shown above the widget
    pub heading: &'static str,
    /// Title shown on the widget itself
    pub title: &'static str,
    pub endpoint: &'static str,
    pub placeholder: Option<&'static str>,
    pub description: Option<&'static str>,
    pub quote: Option<&'static str>,
    pub icon: &'static str,
    pub persona_image: Option<&'static str>,
    pub greeting: Option<&'static str>,
}

pub const ORCHESTRATOR: AgentConfig = AgentConfig {
    key: "orchestrator",
    heading: "Central DunderAI (Orquestrador)",
    title: "Orquestrador Central",
    endpoint: "/api/orchestrator",
    placeholder: Some("Ex: Verifique se há fraudes financeiras envolvendo o Oscar em 2008."),
    description: Some(
        "Este é o sistema central. Faça uma pergunta complexa e ele coordenará os departamentos \
         financeiro, de e-mails e de compliance para te dar uma resposta completa.",
    ),
    quote: None,
    icon: "◆",
    persona_image: None,
    greeting: Some(
        "Sistema DunderAI online. Estou pronto para coordenar a auditoria. Qual a sua solicitação?",
    ),
};

pub const FINANCE: AgentConfig = AgentConfig {
    key: "finance",
    heading: "Departamento Financeiro",
    title: "Agente Departamento Financeiro",
    endpoint: "/api/finance",
    placeholder: Some("Ex: Qual o total gasto pelo Michael em restaurantes?"),
    description: Some(
        "Acesso direto aos registros CSV bancários. Ideal para perguntas numéricas exatas.",
    ),
    quote: None,
    icon: "$",
    persona_image: None,
    greeting: None,
};

pub const EMAILS: AgentConfig = AgentConfig {
    key: "emails",
    heading: "Investigação de E-mails (Profiler)",
    title: "Agente Investigação de E-mails (Profiler)",
    endpoint: "/api/profiler",
    placeholder: Some("Ex: O que o Dwight falou sobre planos de segurança?"),
    description: Some("Busca vetorial (RAG) no arquivo morto de e-mails de 2008."),
    quote: None,
    icon: "@",
    persona_image: None,
    greeting: None,
};

pub const COMPLIANCE: AgentConfig = AgentConfig {
    key: "compliance",
    heading: "Compliance & Regras",
    title: "Agente Compliance & Regras",
    endpoint: "/api/compliance",
    placeholder: Some("Ex: É permitido gastar mais de $100 sem recibo?"),
    description: Some("Verificação de regras e políticas da empresa."),
    quote: None,
    icon: "§",
    persona_image: None,
    greeting: None,
};

pub const MICHAEL: AgentConfig = AgentConfig {
    key: "michael",
    heading: "A Experiência Michael Scott",
    title: "Gerente Regional Michael Scott",
    endpoint: "/api/michael/experience",
    placeholder: Some("Pergunte algo ao melhor chefe do mundo..."),
    description: None,
    quote: Some("\"Eu sou Beyoncé, sempre.\" — M.G.S."),
    icon: "☺",
    persona_image: Some("assets/michael.jpg"),
    greeting: Some(
        "Olá! Bem-vindo à minha sala. Pode entrar. O que você quer? Seja rápido, tenho muitas \
         reuniões... mentira, não tenho. Senta aí.",
    ),
};

const ALL: [&AgentConfig; 5] = [&ORCHESTRATOR, &FINANCE, &EMAILS, &COMPLIANCE, &MICHAEL];

impl AgentConfig {
    pub fn all() -> &'static [&'static AgentConfig] {
        &ALL
    }

    pub fn lookup(key: &str) -> Option<&'static AgentConfig> {
        ALL.iter().copied().find(|c| c.key == key)
    }

    pub fn placeholder(&self) -> &'static str {
        self.placeholder.unwrap_or(DEFAULT_PLACEHOLDER)
    }

    /// First assistant message of a fresh session
    pub fn greeting(&self) -> String {
        match self.greeting {
            Some(g) => g.to_string(),
            None => format!("Olá. Sou a interface {}. Como posso ajudar?", self.title),
        }
    }

    /// File name of the persona portrait, for persona chats only
    pub fn portrait_file(&self) -> Option<&'static str> {
        self.persona_image
            .map(|image| image.rsplit('/').next().unwrap_or(image))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_key() {
        assert_eq!(AgentConfig::lookup("emails").map(|c| c.endpoint), Some("/api/profiler"));
        assert!(AgentConfig::lookup("sales").is_none());
    }

    #[test]
    fn test_only_michael_has_a_portrait() {
        assert_eq!(MICHAEL.portrait_file(), Some("michael.jpg"));
        assert!(AgentConfig::all()
            .iter()
            .filter(|c| c.key != "michael")
            .all(|c| c.portrait_file().is_none()));
    }

    #[test]
    fn test_default_greeting_uses_title() {
        assert_eq!(
            FINANCE.greeting(),
            "Olá. Sou a interface Agente Departamento Financeiro. Como posso ajudar?"
        );
        assert!(MICHAEL.greeting().starts_with("Olá! Bem-vindo"));
    }

    #[test]
    fn test_keys_are_unique() {
        let mut keys: Vec<&str> = AgentConfig::all().iter().map(|c| c.key).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), AgentConfig::all().len());
    }
}
