//! Knowledge-store records. Everything here is read-only after load.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Intent taxonomy (intents.json)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordWeight {
    pub word: String,
    pub weight: f64,
}

/// A named user-goal category matched via weighted keyword scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intent {
    pub id: String,
    pub name: String,
    pub keywords: Vec<KeywordWeight>,
    /// Minimum cumulative score required to select this intent.
    pub threshold: f64,
    /// Service key looked up for detail answers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Canned replies; when non-empty one is returned verbatim.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub responses: Vec<String>,
}

impl Intent {
    /// Sum of all keyword weights, i.e. the score of a message hitting every
    /// keyword exactly.
    pub fn max_score(&self) -> f64 {
        self.keywords.iter().map(|k| k.weight).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentsFile {
    pub intents: Vec<Intent>,
}

// ---------------------------------------------------------------------------
// Knowledge base (knowledge-base.json)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBase {
    pub company: Company,
    pub services: Vec<Service>,
    pub process: Vec<ProcessStep>,
    pub booking: Booking,
}

impl KnowledgeBase {
    pub fn service(&self, key: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.key == key)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    #[serde(default)]
    pub tagline: String,
    pub description: String,
    #[serde(default)]
    pub industries: Vec<String>,
    pub contact: Contact,
    pub stats: CompanyStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub email: String,
    pub phone: String,
    /// Scheduling link used as the call-to-action in most answers.
    pub calendly: String,
    pub address: Address,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
    pub full: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyStats {
    pub projects_delivered: String,
    pub years_experience: String,
    pub client_satisfaction: String,
    pub active_clients: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    /// Stable identifier referenced by `Intent::context`.
    pub key: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    pub pricing_range: Option<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessStep {
    pub step: u32,
    pub name: String,
    pub description: String,
    pub duration: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub message: String,
    pub alternative: String,
}

// ---------------------------------------------------------------------------
// Pricing tables (pricing-details.json)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingDetails {
    pub website_development: Vec<PricingTier>,
    pub mobile_apps: Vec<PricingTier>,
    pub ai_chatbot_development: Vec<PricingTier>,
    #[serde(default)]
    pub packages: Vec<Package>,
    pub related_services: RelatedServices,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingTier {
    pub tier: String,
    pub cost: String,
    pub timeline: String,
    #[serde(default)]
    pub includes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    pub price: String,
    #[serde(default)]
    pub includes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelatedServices {
    pub maintenance_and_support: Vec<SupportPlan>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportPlan {
    pub name: String,
    pub price: String,
    pub summary: String,
}

// ---------------------------------------------------------------------------
// Problem -> service map (services-problems.json)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicesProblemsMap {
    pub services_solutions_map: Vec<ProblemCategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemCategory {
    pub category: String,
    pub services: Vec<ProblemSolution>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemSolution {
    pub service_name: String,
    pub problem_resolved: String,
    pub target_audience: String,
}
