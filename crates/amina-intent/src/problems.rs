//! Business-problem detection and problem→service matching.

use amina_core::types::{ProblemCategory, ProblemSolution, ServicesProblemsMap};

use crate::normalize::Normalizer;

/// Recommendations are capped at this many services.
pub const MAX_RECOMMENDATIONS: usize = 3;

/// Problem names and the phrases that signal them.
pub const PROBLEM_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "online presence",
        &["online presence", "visibility", "not found online", "invisible", "no website"],
    ),
    (
        "lead generation",
        &["lead", "conversion", "not converting", "generate leads", "sales"],
    ),
    (
        "sales channels",
        &["sales channel", "reach customers", "global market", "e-commerce"],
    ),
    (
        "customer engagement",
        &["engagement", "retention", "interact", "customer service"],
    ),
    (
        "repetitive queries",
        &["repetitive", "same questions", "support queries", "automated support"],
    ),
    ("scalability", &["scale", "peak loads", "infrastructure", "growth"]),
    ("legacy system", &["legacy", "outdated", "monolithic", "technical debt"]),
    ("mobile access", &["mobile", "field operations", "remote access"]),
    ("email marketing", &["email", "open rates", "marketing automation"]),
    (
        "internal knowledge",
        &["knowledge base", "onboarding", "employee training"],
    ),
];

/// A service recommended for a detected problem.
#[derive(Debug, Clone, Copy)]
pub struct Recommendation<'a> {
    pub category: &'a ProblemCategory,
    pub service: &'a ProblemSolution,
}

/// Problem table with keywords pre-normalized.
pub struct ProblemMatcher {
    normalizer: Normalizer,
    problems: Vec<(&'static str, Vec<String>)>,
}

impl ProblemMatcher {
    pub fn new(normalizer: Normalizer) -> Self {
        let problems = PROBLEM_KEYWORDS
            .iter()
            .map(|(name, keywords)| {
                let keywords = keywords
                    .iter()
                    .map(|k| normalizer.normalize(k))
                    .filter(|k| !k.is_empty())
                    .collect();
                (*name, keywords)
            })
            .collect();
        Self {
            normalizer,
            problems,
        }
    }

    /// Names of the problems mentioned in `text`, in table order.
    pub fn detect_problems(&self, text: &str) -> Vec<&'static str> {
        let message = self.normalizer.normalize(text);
        self.problems
            .iter()
            .filter(|(_, keywords)| keywords.iter().any(|k| message.contains(k.as_str())))
            .map(|(name, _)| *name)
            .collect()
    }

    /// Services whose resolved problem mentions a keyword of any detected
    /// problem, in map order, at most [`MAX_RECOMMENDATIONS`].
    pub fn recommend<'a>(
        &self,
        text: &str,
        map: &'a ServicesProblemsMap,
    ) -> Vec<Recommendation<'a>> {
        let detected = self.detect_problems(text);
        if detected.is_empty() {
            return Vec::new();
        }
        let keywords: Vec<&str> = self
            .problems
            .iter()
            .filter(|(name, _)| detected.contains(name))
            .flat_map(|(_, keywords)| keywords.iter().map(String::as_str))
            .collect();

        map.services_solutions_map
            .iter()
            .flat_map(|category| {
                category
                    .services
                    .iter()
                    .map(move |service| Recommendation { category, service })
            })
            .filter(|r| {
                let resolved = self.normalizer.normalize(&r.service.problem_resolved);
                keywords.iter().any(|k| resolved.contains(*k))
            })
            .take(MAX_RECOMMENDATIONS)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> ProblemMatcher {
        ProblemMatcher::new(Normalizer::new(["sarayatech"]))
    }

    fn map() -> ServicesProblemsMap {
        let solution = |name: &str, problem: &str| ProblemSolution {
            service_name: name.to_string(),
            problem_resolved: problem.to_string(),
            target_audience: "Everyone".to_string(),
        };
        ServicesProblemsMap {
            services_solutions_map: vec![
                ProblemCategory {
                    category: "Web".to_string(),
                    services: vec![
                        solution("Site", "Low visibility online"),
                        solution("Shop", "No E-Commerce channel"),
                    ],
                },
                ProblemCategory {
                    category: "Cloud".to_string(),
                    services: vec![
                        solution("Migrate", "Cannot scale at peak loads"),
                        solution("Modernize", "Legacy stack"),
                        solution("Autoscale", "Scale on demand"),
                        solution("Grow", "Infrastructure growth"),
                        solution("Burst", "Scale for seasonal events"),
                    ],
                },
            ],
        }
    }

    #[test]
    fn detects_problems_in_table_order() {
        let found = matcher().detect_problems("Our legacy site has poor visibility");
        assert_eq!(found, vec!["online presence", "legacy system"]);
    }

    #[test]
    fn hyphenated_keywords_match_after_normalization() {
        assert_eq!(
            matcher().detect_problems("we want to sell via e-commerce"),
            vec!["sales channels"]
        );
        let map = map();
        let recs = matcher().recommend("e-commerce", &map);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].service.service_name, "Shop");
    }

    #[test]
    fn nothing_detected_means_no_recommendations() {
        let map = map();
        assert!(matcher().detect_problems("hello there").is_empty());
        assert!(matcher().recommend("hello there", &map).is_empty());
    }

    #[test]
    fn recommendations_keep_map_order_and_cap() {
        let map = map();
        let recs = matcher().recommend("we need to scale", &map);
        let names: Vec<&str> = recs.iter().map(|r| r.service.service_name.as_str()).collect();
        assert_eq!(names, vec!["Migrate", "Autoscale", "Grow"]);
        assert!(recs.iter().all(|r| r.category.category == "Cloud"));
    }
}
