//! Tab collection, one key-set context per tab

use crate::context::KeySetContext;
use crate::error::WorkbenchError;

/// Id of the tab present from the start
pub const DEFAULT_TAB_ID: &str = "default";
/// Name of the tab present from the start
pub const DEFAULT_TAB_NAME: &str = "Default JWK";

/// A named key-set session
#[derive(Debug, Clone)]
pub struct Tab {
    id: String,
    name: String,
    context: KeySetContext,
}

impl Tab {
    fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            context: KeySetContext::new(),
        }
    }

    /// Stable id
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Key-set state
    #[must_use]
    pub fn context(&self) -> &KeySetContext {
        &self.context
    }
}

/// Ordered tabs with one active
#[derive(Debug, Clone)]
pub struct TabCollection {
    tabs: Vec<Tab>,
    active: String,
    next_index: usize,
}

impl Default for TabCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl TabCollection {
    /// Collection holding only the default tab
    #[must_use]
    pub fn new() -> Self {
        Self {
            tabs: vec![Tab::new(DEFAULT_TAB_ID.to_string(), DEFAULT_TAB_NAME.to_string())],
            active: DEFAULT_TAB_ID.to_string(),
            next_index: 1,
        }
    }

    /// Open a new empty tab, make it active and return its id
    pub fn add(&mut self) -> String {
        let id = format!("tab-{}", self.next_index);
        let name = format!("JWK Set {}", self.next_index);
        self.next_index += 1;

        self.tabs.push(Tab::new(id.clone(), name));
        self.active.clone_from(&id);
        id
    }

    /// Close a tab
    ///
    /// The default tab and unknown ids are left alone and yield `None`.
    /// Closing the active tab activates the first remaining tab.
    pub fn remove(&mut self, id: &str) -> Option<Tab> {
        if id == DEFAULT_TAB_ID {
            return None;
        }
        let index = self.tabs.iter().position(|tab| tab.id == id)?;
        let removed = self.tabs.remove(index);

        if self.active == id {
            self.active = self
                .tabs
                .first()
                .map_or_else(|| DEFAULT_TAB_ID.to_string(), |tab| tab.id.clone());
        }
        Some(removed)
    }

    /// Rename a tab
    ///
    /// # Errors
    /// Returns `WorkbenchError::UnknownTab` if no tab has this id.
    pub fn rename(&mut self, id: &str, name: impl Into<String>) -> Result<(), WorkbenchError> {
        let tab = self.get_mut(id)?;
        tab.name = name.into();
        Ok(())
    }

    /// Activate a tab; unknown ids are ignored
    ///
    /// Returns whether the active tab changed to `id`.
    pub fn switch(&mut self, id: &str) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.active = id.to_string();
        true
    }

    /// Tab by id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|tab| tab.id == id)
    }

    /// Id of the active tab
    #[must_use]
    pub fn active_id(&self) -> &str {
        &self.active
    }

    /// The active tab
    #[must_use]
    pub fn active(&self) -> &Tab {
        // The default tab is never removed, so the active id always resolves.
        self.get(&self.active).unwrap_or(&self.tabs[0])
    }

    /// Tabs in creation order
    pub fn iter(&self) -> impl Iterator<Item = &Tab> {
        self.tabs.iter()
    }

    /// Number of open tabs
    #[must_use]
    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    /// Always `false`; the default tab cannot be closed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Replace a tab's context with `update(context)`
    ///
    /// # Errors
    /// Returns `WorkbenchError::UnknownTab` if no tab has this id.
    pub fn update<F>(&mut self, id: &str, update: F) -> Result<(), WorkbenchError>
    where
        F: FnOnce(KeySetContext) -> KeySetContext,
    {
        let tab = self.get_mut(id)?;
        let context = std::mem::take(&mut tab.context);
        tab.context = update(context);
        Ok(())
    }

    /// Replace the active tab's context with `update(context)`
    pub fn update_active<F>(&mut self, update: F)
    where
        F: FnOnce(KeySetContext) -> KeySetContext,
    {
        let active = self.active.clone();
        // Active id always names an open tab.
        let _ = self.update(&active, update);
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Tab, WorkbenchError> {
        self.tabs
            .iter_mut()
            .find(|tab| tab.id == id)
            .ok_or_else(|| WorkbenchError::UnknownTab(id.to_string()))
    }
}
