use crate::constants::DEFAULT_API_BASE;

#[derive(Debug, Clone)]
pub struct CoreConfig {
    pub api_base: String,
}

impl CoreConfig {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
        }
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}
