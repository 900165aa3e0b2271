//! Markdown answers built from the knowledge store.
//!
//! Every answer ends with site-relative links and, for most kinds, the
//! scheduling link. Output is never empty: anything that cannot be answered
//! falls through to [`ResponseGenerator::default_response`].

use std::sync::Arc;

use amina_core::types::{Intent, PricingTier};
use amina_core::KnowledgeStore;
use tracing::debug;

use crate::error::IntentError;
use crate::handler::{HandlerTable, IntentHandler};
use crate::normalize::Normalizer;
use crate::problems::ProblemMatcher;
use crate::random::RandomSource;

pub struct ResponseGenerator {
    store: Arc<KnowledgeStore>,
    handlers: HandlerTable,
    problems: ProblemMatcher,
    random: Arc<dyn RandomSource>,
}

impl ResponseGenerator {
    pub fn new(
        store: Arc<KnowledgeStore>,
        normalizer: Normalizer,
        random: Arc<dyn RandomSource>,
    ) -> Result<Self, IntentError> {
        let handlers = HandlerTable::build(&store.intents, &store.knowledge)?;
        Ok(Self {
            store,
            handlers,
            problems: ProblemMatcher::new(normalizer),
            random,
        })
    }

    /// Answer for a classified (or unclassified) message.
    pub fn generate(&self, matched: Option<&Intent>, user_text: &str) -> String {
        let Some(intent) = matched else {
            return self
                .problem_solution(user_text)
                .unwrap_or_else(|| self.default_response());
        };

        if !intent.responses.is_empty() {
            let index = self.random.pick(intent.responses.len());
            if let Some(reply) = intent.responses.get(index) {
                return reply.clone();
            }
        }

        let reply = match self.handlers.get(&intent.id) {
            Some(handler) => self.render(handler, intent, user_text),
            None => None,
        };
        match reply {
            Some(text) if !text.trim().is_empty() => text,
            _ => {
                debug!(intent = %intent.id, "no templated answer, using default");
                self.default_response()
            }
        }
    }

    fn render(&self, handler: IntentHandler, intent: &Intent, user_text: &str) -> Option<String> {
        let text = match handler {
            IntentHandler::ServicesOverview => self.services_overview(),
            IntentHandler::ServiceDetail => return self.service_detail(intent.context.as_deref()?),
            IntentHandler::Pricing => self.pricing(),
            IntentHandler::Contact => self.contact(),
            IntentHandler::Booking => self.booking(),
            IntentHandler::Process => self.process(),
            IntentHandler::Company => self.company(),
            IntentHandler::Payment => self.payment(),
            IntentHandler::Contract => self.contract(),
            IntentHandler::Support => self.support(),
            IntentHandler::ProblemSolution => return self.problem_solution(user_text),
        };
        Some(text)
    }

    fn calendly(&self) -> &str {
        &self.store.knowledge.company.contact.calendly
    }

    pub fn services_overview(&self) -> String {
        let list = self
            .store
            .knowledge
            .services
            .iter()
            .map(|s| format!("• **{}**: {}", s.name, s.description))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "We offer a comprehensive range of digital solutions:\n\n{list}\n\n\
             Which service interests you? I'd be happy to provide more details!\n\n\
             🔗 **Explore all our services:** /solutions"
        )
    }

    /// Detail card for one service; `None` when the key is unknown.
    pub fn service_detail(&self, key: &str) -> Option<String> {
        let service = self.store.knowledge.service(key)?;
        let mut out = format!("**{}**\n\n{}\n\n", service.name, service.description);

        if !service.features.is_empty() {
            out.push_str("**Key Features:**\n");
            out.push_str(&bullets(&service.features));
            out.push_str("\n\n");
        }
        if !service.technologies.is_empty() {
            out.push_str(&format!(
                "**Technologies:** {}\n\n",
                service.technologies.join(", ")
            ));
        }
        if let Some(range) = &service.pricing_range {
            out.push_str(&format!("**Pricing:** {range}\n\n"));
        }
        if !service.benefits.is_empty() {
            out.push_str("**Benefits:**\n");
            out.push_str(&bullets(&service.benefits));
            out.push_str("\n\n");
        }
        out.push_str("🔗 **View all our solutions:** /solutions\n\n");
        out.push_str(&format!(
            "Would you like to schedule a consultation to discuss your specific needs? Book here: {}",
            self.calendly()
        ));
        Some(out)
    }

    pub fn pricing(&self) -> String {
        let pricing = &self.store.pricing;
        let mut out = String::from(
            "Our pricing varies based on project scope, complexity, and requirements. \
             Here are detailed breakdowns:\n\n",
        );
        for (title, tiers) in [
            ("Website Development", &pricing.website_development),
            ("Mobile Apps", &pricing.mobile_apps),
            ("AI Chatbots", &pricing.ai_chatbot_development),
        ] {
            out.push_str(&format!("**{title}:**\n{}\n\n", tier_lines(tiers)));
        }
        out.push_str("🔗 **See detailed service information:** /solutions\n");
        out.push_str("🔗 **Contact us for a quote:** /contact\n\n");

        if !pricing.packages.is_empty() {
            let names: Vec<&str> = pricing.packages.iter().map(|p| p.name.as_str()).collect();
            out.push_str(&format!(
                "Want to explore our packages? Ask me about our {} bundles!\n\n",
                join_or(&names)
            ));
        }
        out.push_str(&format!("Schedule a free consultation: {}", self.calendly()));
        out
    }

    pub fn contact(&self) -> String {
        let contact = &self.store.knowledge.company.contact;
        format!(
            "You can reach us through:\n\n\
             📧 **Email:** {}\n\
             📞 **Phone:** {}\n\
             📍 **Address:** {}\n\
             📅 **Book a Meeting:** {}\n\n\
             🔗 **Visit our contact page:** /contact\n\n\
             We're available to discuss your project and answer any questions. What works best for you?",
            contact.email, contact.phone, contact.address.full, contact.calendly
        )
    }

    pub fn booking(&self) -> String {
        let booking = &self.store.knowledge.booking;
        format!("{}\n\n{}", booking.message, booking.alternative)
    }

    pub fn process(&self) -> String {
        let mut out = String::from("Our proven process ensures successful project delivery:\n\n");
        for step in &self.store.knowledge.process {
            out.push_str(&format!(
                "**{}. {}**\n{}\n⏱️ Duration: {}\n\n",
                step.step, step.name, step.description, step.duration
            ));
        }
        out.push_str("🔗 **Learn more about us:** /about\n\n");
        out.push_str(&format!(
            "Ready to get started? Let's schedule a consultation: {}",
            self.calendly()
        ));
        out
    }

    pub fn company(&self) -> String {
        let company = &self.store.knowledge.company;
        let stats = &company.stats;
        let industries = if company.industries.is_empty() {
            String::new()
        } else {
            format!(
                "We've worked with clients across various industries including {}.\n\n",
                company.industries.join(", ")
            )
        };
        format!(
            "**About {}**\n\n{}\n\n\
             **Our Track Record:**\n\
             • {} projects successfully delivered\n\
             • {} of industry experience\n\
             • {} client satisfaction rate\n\
             • {} active users across our platforms\n\n\
             {industries}\
             📍 Based in {}, {}\n\n\
             🔗 **Learn more about our team:** /about\n\
             🔗 **View our case studies:** /realisation",
            company.name,
            company.description,
            stats.projects_delivered,
            stats.years_experience,
            stats.client_satisfaction,
            stats.active_clients,
            company.contact.address.city,
            company.contact.address.state,
        )
    }

    pub fn payment(&self) -> String {
        format!(
            "We offer flexible payment terms to accommodate different business needs:\n\n\
             **Standard Payment Structure:**\n\
             • 30% deposit upon project kickoff\n\
             • 40% at milestone completion (mid-project)\n\
             • 30% upon final delivery and approval\n\n\
             **For Larger Projects ($20k+):**\n\
             We can structure milestone-based payments aligned with deliverables.\n\n\
             **Payment Methods:**\n\
             We accept bank transfers and credit cards. Enterprise clients can work with Net-30 or Net-60 terms.\n\n\
             🔗 **Get a detailed quote:** /contact\n\n\
             Would you like to discuss a payment plan that works for your budget? Schedule a call: {}",
            self.calendly()
        )
    }

    pub fn contract(&self) -> String {
        format!(
            "**Our Contract & Terms**\n\n\
             We believe in transparent, fair agreements:\n\n\
             • **Clear Scope**: Detailed project scope with deliverables and timelines\n\
             • **Intellectual Property**: You own all code and assets upon final payment\n\
             • **Confidentiality**: NDA protection for your business ideas and data\n\
             • **Warranty**: 30-90 day warranty for bug fixes post-launch\n\
             • **Revisions**: Agreed-upon revision rounds included in the scope\n\n\
             🔗 **Contact us for contract details:** /contact\n\n\
             We're happy to review our standard agreement or work with your legal team. Book a consultation: {}",
            self.calendly()
        )
    }

    pub fn support(&self) -> String {
        let plans = self
            .store
            .pricing
            .related_services
            .maintenance_and_support
            .iter()
            .map(|p| format!("• **{}**: {} - {}", p.name, p.price, p.summary))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "**Post-Launch Support & Maintenance**\n\n\
             We offer support packages to keep your solution running smoothly:\n\n\
             {plans}\n\n\
             All our projects include:\n\
             • Initial warranty period (30-90 days based on project size)\n\
             • Knowledge transfer and documentation\n\
             • Training sessions for your team\n\n\
             🔗 **Learn more:** /solutions\n\
             🔗 **Contact us:** /contact\n\n\
             Need ongoing support? Let's discuss: {}",
            self.calendly()
        )
    }

    /// Up to three services addressing the problems mentioned in the message.
    pub fn problem_solution(&self, user_text: &str) -> Option<String> {
        let recommendations = self.problems.recommend(user_text, &self.store.problems);
        if recommendations.is_empty() {
            return None;
        }
        let cards = recommendations
            .iter()
            .map(|r| {
                format!(
                    "**{}** ({})\n• Solves: {}\n• Ideal for: {}",
                    r.service.service_name,
                    r.category.category,
                    r.service.problem_resolved,
                    r.service.target_audience
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");
        Some(format!(
            "Based on your needs, here are solutions that can help:\n\n{cards}\n\n\
             🔗 **Explore all solutions:** /solutions\n\
             🔗 **Get a custom quote:** /contact\n\n\
             Want to discuss which solution fits your specific situation? Book a free consultation: {}",
            self.calendly()
        ))
    }

    pub fn default_response(&self) -> String {
        let company = &self.store.knowledge.company;
        let contact = &company.contact;
        format!(
            "That's a great question! While I'm still learning, I'd be happy to connect you \
             with our team who can provide detailed answers.\n\n\
             🔗 **Explore our services:** /solutions\n\
             🔗 **Learn about us:** /about\n\
             🔗 **View our projects:** /realisation\n\
             🔗 **Get in touch:** /contact\n\n\
             You can also reach us directly:\n\
             📧 **Email:** {}\n\
             📍 **Address:** {}, {}\n\
             📅 **Book a meeting:** {}\n\n\
             What else would you like to know about {}?",
            contact.email, contact.address.city, contact.address.state, contact.calendly, company.name
        )
    }
}

fn bullets(items: &[String]) -> String {
    items
        .iter()
        .map(|i| format!("• {i}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn tier_lines(tiers: &[PricingTier]) -> String {
    tiers
        .iter()
        .map(|t| format!("• {}: {} ({})", t.tier, t.cost, t.timeline))
        .collect::<Vec<_>>()
        .join("\n")
}

/// "A", "A or B", "A, B, or C".
fn join_or(items: &[&str]) -> String {
    match items {
        [] => String::new(),
        [one] => one.to_string(),
        [a, b] => format!("{a} or {b}"),
        [rest @ .., last] => format!("{}, or {last}", rest.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::FixedIndex;

    fn generator() -> ResponseGenerator {
        let store = Arc::new(KnowledgeStore::embedded().expect("embedded"));
        ResponseGenerator::new(store, Normalizer::new(["sarayatech"]), Arc::new(FixedIndex(1)))
            .expect("generator")
    }

    fn intent(g: &ResponseGenerator, id: &str) -> Intent {
        g.store
            .intents
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .expect("intent exists")
    }

    #[test]
    fn pooled_intents_use_the_random_source() {
        let g = generator();
        let greeting = intent(&g, "greeting");
        assert_eq!(g.generate(Some(&greeting), "hi"), greeting.responses[1]);
    }

    #[test]
    fn service_detail_renders_every_section() {
        let g = generator();
        let web = intent(&g, "web_development");
        let text = g.generate(Some(&web), "website");
        let service = g.store.knowledge.service("web_development").unwrap();
        assert!(text.starts_with(&format!("**{}**", service.name)));
        assert!(text.contains("**Key Features:**"));
        assert!(text.contains("/solutions"));
        assert!(text.ends_with(g.calendly()));
    }

    #[test]
    fn unknown_service_key_has_no_detail() {
        assert!(generator().service_detail("teleportation").is_none());
    }

    #[test]
    fn pricing_lists_every_tier_and_package() {
        let g = generator();
        let text = g.pricing();
        for tier in g
            .store
            .pricing
            .website_development
            .iter()
            .chain(&g.store.pricing.mobile_apps)
            .chain(&g.store.pricing.ai_chatbot_development)
        {
            assert!(text.contains(&tier.cost), "missing {}", tier.tier);
        }
        assert!(text.contains("Bronze, Silver, or Gold"));
    }

    #[test]
    fn support_lists_every_plan() {
        let g = generator();
        let text = g.support();
        for plan in &g.store.pricing.related_services.maintenance_and_support {
            assert!(text.contains(&plan.name));
        }
    }

    #[test]
    fn process_lists_steps_in_order() {
        let g = generator();
        let text = g.process();
        let positions: Vec<usize> = g
            .store
            .knowledge
            .process
            .iter()
            .map(|s| text.find(&s.name).expect("step present"))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn problem_intent_without_matching_service_falls_back() {
        let g = generator();
        let churn = intent(&g, "problem_customer_engagement");
        // "churn" triggers the intent but no problem keyword
        let text = g.generate(Some(&churn), "churn");
        assert_eq!(text, g.default_response());
    }

    #[test]
    fn unmatched_message_with_problem_gets_recommendations() {
        let g = generator();
        let text = g.generate(None, "our site has poor visibility");
        assert!(text.starts_with("Based on your needs"));
        assert!(text.contains("**Business Website** (Web & Digital Presence)"));
    }

    #[test]
    fn default_response_links_every_section() {
        let text = generator().default_response();
        for link in ["/solutions", "/about", "/realisation", "/contact"] {
            assert!(text.contains(link));
        }
        assert!(text.contains("Columbus, OH"));
    }

    #[test]
    fn join_or_handles_short_lists() {
        assert_eq!(join_or(&[]), "");
        assert_eq!(join_or(&["A"]), "A");
        assert_eq!(join_or(&["A", "B"]), "A or B");
        assert_eq!(join_or(&["A", "B", "C"]), "A, B, or C");
    }
}
