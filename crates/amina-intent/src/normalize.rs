/// Text normalization shared by intent scoring and problem matching.
///
/// Lowercases, turns every non-word character into a space, collapses runs of
/// whitespace and strips brand names so the company's own name never counts
/// as a keyword hit. The output is a fixed point: normalizing it again
/// returns it unchanged.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    brands: Vec<String>,
}

impl Normalizer {
    pub fn new<I, S>(brand_tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let brands = brand_tokens
            .into_iter()
            .map(|b| clean(b.as_ref()))
            .filter(|b| !b.is_empty())
            .collect();
        Self { brands }
    }

    pub fn normalize(&self, text: &str) -> String {
        let mut out = clean(text);
        // removing one brand can splice two fragments into another brand
        // ("saraya sarayatech tech"), so strip until nothing is left
        while self.brands.iter().any(|b| out.contains(b.as_str())) {
            for brand in &self.brands {
                out = out.replace(brand.as_str(), " ");
            }
            out = collapse(&out);
        }
        out
    }
}

fn clean(text: &str) -> String {
    let mapped: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();
    collapse(&mapped)
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
