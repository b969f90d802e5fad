//! Career categories and the keywords that identify them.

/// A named career slot and the lower-case phrases that signal it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    name: String,
    keywords: Vec<String>,
}

impl Category {
    pub fn new<I, S>(name: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            name: name.into(),
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Case-insensitive substring match against any keyword.
    pub fn matches(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.keywords.iter().any(|k| lower.contains(k.as_str()))
    }
}

/// Ordered set of categories. Order decides ties: the first matching category wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxonomy {
    categories: Vec<Category>,
}

impl Taxonomy {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// The four specialisations profiles were originally organised around.
    pub fn legacy() -> Self {
        Self::new(vec![
            Category::new(
                "data_science",
                [
                    "data scientist",
                    "data science",
                    "machine learning",
                    "ml engineer",
                    "ai engineer",
                    "artificial intelligence",
                    "data analyst",
                    "analytics",
                ],
            ),
            Category::new(
                "data_engineering",
                [
                    "data engineer",
                    "data engineering",
                    "etl",
                    "data pipeline",
                    "big data",
                    "hadoop",
                    "spark",
                    "kafka",
                    "data warehouse",
                ],
            ),
            Category::new(
                "computer_vision",
                [
                    "computer vision",
                    "cv engineer",
                    "image processing",
                    "opencv",
                    "tensorflow",
                    "pytorch",
                    "deep learning",
                    "neural networks",
                    "cnn",
                ],
            ),
            Category::new(
                "cto",
                [
                    "cto",
                    "chief technology officer",
                    "technical leader",
                    "tech lead",
                    "engineering manager",
                    "vp engineering",
                    "head of engineering",
                    "director of engineering",
                    "technical director",
                ],
            ),
        ])
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(Category::name)
    }

    /// First category with a keyword occurring in `text`.
    pub fn classify(&self, text: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.matches(text))
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::legacy()
    }
}
