//! services/hub/src/catalog.rs
//!
//! The catalog of AI agents listed on the hub's landing page. Pure data;
//! how the cards are rendered is the front-end's business.

use serde::Serialize;
use utoipa::ToSchema;

/// Icon identifier understood by the front-end's icon set.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub enum AgentIcon {
    BookOpen,
    FileText,
    Atom,
    FlaskConical,
    Dna,
    Library,
    Globe,
    Languages,
    PenTool,
    GraduationCap,
}

/// One agent card on the landing page.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Agent {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// In-app path or external URL.
    pub url: &'static str,
    pub icon: AgentIcon,
    pub requires_login: bool,
    /// Inactive cards render as "coming soon" and are not clickable.
    pub is_active: bool,
}

/// The hub's agent catalog. The "Redação" agent handles its own
/// credit-based access internally, but reaching its link from the hub
/// still requires login for consistency.
pub const AGENTS: &[Agent] = &[
    Agent {
        id: "ai-ebook",
        name: "Agente IA do E-book",
        description: "Perguntas e respostas sobre os assuntos do e-book.",
        url: "/livro",
        icon: AgentIcon::BookOpen,
        requires_login: true,
        is_active: true,
    },
    Agent {
        id: "ai-redacao",
        name: "Agente IA Corretor de Redação",
        description: "Correção automática com critérios de banca e relatório detalhado.",
        url: "https://redacao-grader-starter-geral.vercel.app/tools/redacao",
        icon: AgentIcon::FileText,
        requires_login: true,
        is_active: true,
    },
    Agent {
        id: "ai-fisica",
        name: "Agente IA Tutor de Física",
        description: "Tutoria passo a passo com foco em vestibulares.",
        url: "https://fisica.dcz-pensando-educacao.com",
        icon: AgentIcon::Atom,
        requires_login: true,
        is_active: false,
    },
    Agent {
        id: "ai-quimica",
        name: "Agente IA Tutor de Química",
        description: "Tutoria passo a passo com foco em vestibulares.",
        url: "https://quimica.dcz-pensando-educacao.com",
        icon: AgentIcon::FlaskConical,
        requires_login: true,
        is_active: false,
    },
    Agent {
        id: "ai-biologia",
        name: "Agente IA Tutor de Biologia",
        description: "Tutoria passo a passo com foco em vestibulares.",
        url: "https://biologia.dcz-pensando-educacao.com",
        icon: AgentIcon::Dna,
        requires_login: true,
        is_active: false,
    },
    Agent {
        id: "ai-historia",
        name: "Agente IA Tutor de História",
        description: "Tutoria passo a passo com foco em vestibulares.",
        url: "https://historia.dcz-pensando-educacao.com",
        icon: AgentIcon::Library,
        requires_login: true,
        is_active: false,
    },
    Agent {
        id: "ai-geografia",
        name: "Agente IA Tutor de Geografia",
        description: "Tutoria passo a passo com foco em vestibulares.",
        url: "https://geografia.dcz-pensando-educacao.com",
        icon: AgentIcon::Globe,
        requires_login: true,
        is_active: false,
    },
    Agent {
        id: "ai-portugues",
        name: "Agente IA Tutor de Português",
        description: "Gramática, interpretação e produção de texto.",
        url: "https://portugues.dcz-pensando-educacao.com",
        icon: AgentIcon::Languages,
        requires_login: true,
        is_active: false,
    },
    Agent {
        id: "ai-english-writing",
        name: "Agente IA Escrita em Inglês",
        description: "Correção e melhoria de escrita em inglês com feedback claro.",
        url: "https://writing-english.dcz-pensando-educacao.com",
        icon: AgentIcon::PenTool,
        requires_login: true,
        is_active: false,
    },
    Agent {
        id: "ai-english-learning",
        name: "Agente IA Aprendizagem de Inglês",
        description: "Prática guiada e personalizada para aprender inglês.",
        url: "https://learn-english.dcz-pensando-educacao.com",
        icon: AgentIcon::GraduationCap,
        requires_login: true,
        is_active: false,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let mut ids: Vec<_> = AGENTS.iter().map(|a| a.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), AGENTS.len());
    }

    #[test]
    fn the_ebook_agent_is_the_in_app_route() {
        let ebook = AGENTS.iter().find(|a| a.id == "ai-ebook").unwrap();
        assert_eq!(ebook.url, agent_hub_core::domain::LIVRO_PATH);
        assert!(ebook.is_active);
        assert!(ebook.requires_login);
    }
}
