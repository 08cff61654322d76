// src/taxonomy.rs
//! Keyword taxonomy: canonical industry / role labels mapped to lowercase expansion
//! keywords. Pure data; the scorer only ever asks "which keywords belong to this label".
//!
//! The built-in tables can be extended or overridden from a TOML asset:
//!
//! ```toml
//! [industries]
//! "Agriculture" = ["agtech", "crop", "farm"]
//!
//! [roles]
//! "Librarian" = ["catalog", "archives", "library"]
//! ```

use anyhow::Context;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_TAXONOMY_PATH: &str = "config/taxonomy.toml";
pub const ENV_TAXONOMY_PATH: &str = "CURATOR_TAXONOMY_PATH";

const INDUSTRIES: &[(&str, &[&str])] = &[
    (
        "Fintech / Financial Services",
        &[
            "fintech", "banking", "payments", "lending", "insurtech", "neobank", "crypto",
            "blockchain", "decentralized finance", "stablecoin", "wealth management", "trading", "open banking",
            "regtech",
        ],
    ),
    (
        "Healthcare / Life Sciences",
        &[
            "healthcare", "health tech", "medical", "clinical", "hospital", "patient", "pharma",
            "biotech", "telehealth", "fda", "diagnostics", "drug discovery",
        ],
    ),
    (
        "E-commerce / Retail",
        &[
            "e-commerce", "ecommerce", "retail", "shopify", "marketplace", "checkout",
            "shopping", "consumer brand", "dtc", "amazon", "merchant", "inventory",
        ],
    ),
    (
        "SaaS / Software",
        &[
            "saas", "software", "cloud", "b2b", "subscription", "platform", "developer platform", "devtools",
            "startup", "enterprise software", "churn", "product-led",
        ],
    ),
    (
        "Marketing / Advertising",
        &[
            "marketing", "advertising", "adtech", "campaign", "seo", "social media",
            "influencer", "brand", "content marketing", "martech", "attribution", "cmo",
        ],
    ),
    (
        "Education / EdTech",
        &[
            "education", "edtech", "learning", "students", "university", "school", "teachers",
            "course", "curriculum", "tutoring", "online learning",
        ],
    ),
    (
        "Manufacturing / Industrial",
        &[
            "manufacturing", "factory", "industrial", "supply chain", "robotics", "automation",
            "internet of things", "3d printing", "production line", "industry 4.0",
        ],
    ),
    (
        "Real Estate / PropTech",
        &[
            "real estate", "proptech", "housing", "mortgage", "property", "commercial real estate",
            "rental", "construction", "real estate investment trust", "homebuyers",
        ],
    ),
    (
        "Media / Entertainment",
        &[
            "media", "entertainment", "streaming", "publishing", "newsroom", "journalism",
            "creator economy", "gaming", "music", "film", "podcast",
        ],
    ),
    (
        "Legal / LegalTech",
        &[
            "legal", "legaltech", "law firm", "lawyer", "litigation", "contract", "compliance",
            "regulation", "court", "attorney",
        ],
    ),
    (
        "Logistics / Transportation",
        &[
            "logistics", "shipping", "freight", "delivery", "warehouse", "fleet", "trucking",
            "last mile", "transportation", "supply chain",
        ],
    ),
    (
        "Energy / Climate",
        &[
            "energy", "climate", "renewable", "solar", "wind power", "battery", "electric vehicle",
            "carbon", "grid", "cleantech", "emissions", "sustainability",
        ],
    ),
    (
        "Consulting / Professional Services",
        &[
            "consulting", "consultancy", "advisory", "professional services", "agency",
            "client engagement", "strategy", "outsourcing",
        ],
    ),
    (
        "Nonprofit / Public Sector",
        &[
            "nonprofit", "non-profit", "charity", "government", "public sector", "non-governmental",
            "philanthropy", "civic", "grant", "policy",
        ],
    ),
];

const ROLES: &[(&str, &[&str])] = &[
    (
        "Software Engineer",
        &[
            "developer", "engineer", "software", "programming", "coding", "devops", "open source",
            "github", "framework", "rust", "python", "javascript", "kubernetes", "copilot",
        ],
    ),
    (
        "Product Manager",
        &[
            "product management", "roadmap", "product launch", "user research", "feature",
            "product strategy", "prioritization", "product-market fit", "backlog",
        ],
    ),
    (
        "Founder / CEO",
        &[
            "founder", "ceo", "startup", "fundraising", "venture capital", "series a", "seed round",
            "leadership", "acquisition", "ipo", "valuation", "investors",
        ],
    ),
    (
        "Marketing Manager",
        &[
            "marketing", "growth", "campaign", "brand", "seo", "content strategy", "advertising",
            "conversion", "audience", "social media",
        ],
    ),
    (
        "Data Scientist",
        &[
            "data science", "machine learning", "analytics", "model", "dataset", "statistics",
            "llm", "deep learning", "prediction", "neural network", "ai research",
        ],
    ),
    (
        "Designer",
        &[
            "design", "ux design", "user interface", "figma", "user experience", "prototype", "accessibility",
            "typography", "design system",
        ],
    ),
    (
        "Sales / Business Development",
        &[
            "sales", "business development", "crm", "pipeline", "dealmaking", "revenue", "salesforce",
            "prospecting", "enterprise customers", "partnership",
        ],
    ),
    (
        "Operations Manager",
        &[
            "operations", "workflow", "efficiency", "process", "automation", "logistics",
            "vendor", "procurement", "scaling",
        ],
    ),
    (
        "Consultant",
        &[
            "consulting", "client", "advisory", "strategy", "transformation", "best practices",
            "framework", "benchmark",
        ],
    ),
    (
        "Investor / VC",
        &[
            "venture capital", "investor", "funding round", "valuation", "portfolio", "limited partners",
            "fund", "term sheet", "exit", "unicorn",
        ],
    ),
    (
        "HR / People",
        &[
            "hiring", "recruiting", "talent", "layoffs", "remote work", "workforce", "employee",
            "culture", "compensation", "hr tech",
        ],
    ),
    (
        "Researcher / Academic",
        &[
            "research", "study", "paper", "academic", "university", "peer review", "arxiv",
            "findings", "scientists",
        ],
    ),
    (
        "Student",
        &[
            "student", "internship", "career", "learning", "course", "bootcamp", "graduate",
            "scholarship",
        ],
    ),
];

static BUILTIN: Lazy<Taxonomy> = Lazy::new(|| Taxonomy {
    industries: to_table(INDUSTRIES),
    roles: to_table(ROLES),
});

fn to_table(src: &[(&str, &[&str])]) -> HashMap<String, Vec<String>> {
    src.iter()
        .map(|(k, kws)| (k.to_string(), clean_keywords(kws.iter().copied())))
        .collect()
}

/// Lowercase, trim, drop blanks and repeats (first occurrence wins).
fn clean_keywords<'a>(kws: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for k in kws {
        let k = k.trim().to_lowercase();
        if !k.is_empty() && !out.contains(&k) {
            out.push(k);
        }
    }
    out
}

#[derive(Debug, Clone, Default, Deserialize)]
struct TaxonomyFile {
    #[serde(default)]
    industries: HashMap<String, Vec<String>>,
    #[serde(default)]
    roles: HashMap<String, Vec<String>>,
}

/// Industry and role lookup tables.
#[derive(Debug, Clone, Default)]
pub struct Taxonomy {
    industries: HashMap<String, Vec<String>>,
    roles: HashMap<String, Vec<String>>,
}

impl Taxonomy {
    /// Shared built-in tables.
    pub fn builtin() -> &'static Taxonomy {
        &BUILTIN
    }

    /// Built-in tables with entries from a TOML string merged over them.
    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        let file: TaxonomyFile = toml::from_str(toml_str).context("parsing taxonomy toml")?;
        let mut tax = BUILTIN.clone();
        for (k, v) in file.industries {
            tax.industries
                .insert(k.trim().to_string(), clean_keywords(v.iter().map(String::as_str)));
        }
        for (k, v) in file.roles {
            tax.roles
                .insert(k.trim().to_string(), clean_keywords(v.iter().map(String::as_str)));
        }
        Ok(tax)
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading taxonomy from {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// `$CURATOR_TAXONOMY_PATH`, else `config/taxonomy.toml` if present, else built-in.
    pub fn load_default() -> anyhow::Result<Self> {
        if let Ok(p) = std::env::var(ENV_TAXONOMY_PATH) {
            return Self::from_path(&PathBuf::from(p));
        }
        let p = PathBuf::from(DEFAULT_TAXONOMY_PATH);
        if p.exists() {
            return Self::from_path(&p);
        }
        Ok(BUILTIN.clone())
    }

    /// Expansion keywords for a canonical industry label; empty when unknown.
    pub fn industry_keywords(&self, industry: &str) -> &[String] {
        self.industries
            .get(industry.trim())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Expansion keywords for a canonical role label; empty when unknown.
    pub fn role_keywords(&self, role: &str) -> &[String] {
        self.roles.get(role.trim()).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn industry_labels(&self) -> Vec<&str> {
        let mut v: Vec<&str> = self.industries.keys().map(String::as_str).collect();
        v.sort_unstable();
        v
    }

    pub fn role_labels(&self) -> Vec<&str> {
        let mut v: Vec<&str> = self.roles.keys().map(String::as_str).collect();
        v.sort_unstable();
        v
    }
}
