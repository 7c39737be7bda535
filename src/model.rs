/// One ingredient or sauce line: trimmed name plus a free-form quantity,
/// which is empty when the page lists no amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientEntry {
    pub name: String,
    pub quantity: String,
}

impl IngredientEntry {
    pub fn new(name: &str, quantity: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            quantity: quantity.trim().to_string(),
        }
    }

    /// Quantity to store on the graph edge, `None` when there is nothing to store.
    pub fn amount(&self) -> Option<&str> {
        let q = self.quantity.trim();
        if q.is_empty() {
            None
        } else {
            Some(q)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub name: String,
    pub ingredients: Vec<IngredientEntry>,
    pub sauces: Vec<IngredientEntry>,
    /// Instructions, each already prefixed with `"<n>. "`.
    pub steps: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Food {
    pub name: String,
    pub recipes: Vec<Recipe>,
}

impl Food {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            recipes: Vec::new(),
        }
    }
}

/// Prefix each instruction with its 1-based position.
pub fn number_steps<I, S>(texts: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    texts
        .into_iter()
        .enumerate()
        .map(|(i, t)| format!("{}. {}", i + 1, t.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_are_numbered_from_one() {
        let steps = number_steps(["Boil water", "Add noodles", "Serve"]);
        assert_eq!(steps, vec!["1. Boil water", "2. Add noodles", "3. Serve"]);
        for (i, s) in steps.iter().enumerate() {
            assert!(s.starts_with(&format!("{}. ", i + 1)));
        }
    }

    #[test]
    fn amount_only_when_quantity_present() {
        assert_eq!(IngredientEntry::new(" rice ", "").amount(), None);
        assert_eq!(IngredientEntry::new("rice", "   ").amount(), None);
        assert_eq!(IngredientEntry::new("rice", " 2 ").amount(), Some("2"));
        assert_eq!(IngredientEntry::new(" rice ", "1").name, "rice");
    }
}
