use serde::Serialize;

/// One declared parameter of an action: `(name, type)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub key: String,
    pub value: String,
}

impl Field {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// One exported controller method discovered in the controllers directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    /// Type name derived from the source file name.
    pub controller: String,
    /// Method name.
    pub name: String,
    /// Parameters in declaration order.
    pub fields: Vec<Field>,
    /// Identifiers listed in the method's `Context{...}` literal, if any.
    pub context_keys: Option<Vec<String>>,
}

/// All actions of one inspection pass, in file-name then source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ActionSet {
    actions: Vec<Action>,
}

impl ActionSet {
    pub fn new(actions: Vec<Action>) -> Self {
        Self { actions }
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Action> {
        self.actions.iter()
    }

    /// Distinct controller names, in first-seen order.
    pub fn controllers(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for action in &self.actions {
            if !seen.contains(&action.controller.as_str()) {
                seen.push(action.controller.as_str());
            }
        }
        seen
    }
}

impl<'a> IntoIterator for &'a ActionSet {
    type Item = &'a Action;
    type IntoIter = std::slice::Iter<'a, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}
