use std::collections::HashMap;

/// Every distinct string literal in the program, in order of first use.
#[derive(Debug, Default, Clone)]
pub struct StringTable {
    literals: Vec<String>,
    lookup: HashMap<String, usize>,
}

impl StringTable {
    pub fn new() -> Self {
        StringTable::default()
    }

    /// Registers `text` and returns its id. Repeated literals share an id.
    pub fn intern(&mut self, text: &str) -> usize {
        if let Some(id) = self.lookup.get(text) {
            return *id;
        }

        let id = self.literals.len();
        self.literals.push(String::from(text));
        self.lookup.insert(String::from(text), id);
        id
    }

    pub fn get(&self, id: usize) -> Option<&str> {
        self.literals.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.literals.iter().enumerate().map(|(id, text)| (id, text.as_str()))
    }
}
