//! Session catalog.
//!
//! Legacy suites address browsers by small sequential integers and aliases.
//! The engine hands out opaque context/page ids instead. [`SessionCatalog`]
//! is the translation table between the two, and keeps each session's page
//! list in sync with the engine through [`reconcile`].
//!
//! Synthetic ids start at 0 and are never reused, even after a close.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::engine::{AutomationEngine, ContextOptions};
use crate::result::{CompatError, CompatResult};

// =============================================================================
// SESSION REFERENCE
// =============================================================================

/// How a caller names a session
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionRef {
    /// Whatever context the engine reports as active
    #[default]
    Current,
    /// Every tracked session (page enumeration only)
    All,
    /// Synthetic id, with the text it was parsed from for the alias fallback
    Index {
        /// Parsed id
        index: u64,
        /// Trimmed source text (`"007"` for index 7)
        raw: String,
    },
    /// Caller alias
    Alias(String),
}

impl SessionRef {
    /// Parse a legacy identifier: `CURRENT`, `ALL`, digits, or an alias
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("CURRENT") {
            return Self::Current;
        }
        if trimmed.eq_ignore_ascii_case("ALL") {
            return Self::All;
        }
        match trimmed.parse::<u64>() {
            Ok(index) if trimmed.bytes().all(|b| b.is_ascii_digit()) => Self::Index {
                index,
                raw: trimmed.to_string(),
            },
            _ => Self::Alias(raw.to_string()),
        }
    }
}

impl From<&str> for SessionRef {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<u64> for SessionRef {
    fn from(index: u64) -> Self {
        Self::Index {
            index,
            raw: index.to_string(),
        }
    }
}

impl fmt::Display for SessionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Current => f.write_str("CURRENT"),
            Self::All => f.write_str("ALL"),
            Self::Index { raw, .. } => f.write_str(raw),
            Self::Alias(alias) => f.write_str(alias),
        }
    }
}

// =============================================================================
// RECONCILIATION
// =============================================================================

/// Counts produced by one [`reconcile`] pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Ids appended because the engine reported them
    pub added: usize,
    /// Ids dropped because the engine no longer reports them
    pub removed: usize,
}

impl Reconciliation {
    /// Whether the cached list changed
    #[must_use]
    pub const fn is_unchanged(&self) -> bool {
        self.added == 0 && self.removed == 0
    }
}

/// Bring a cached id list in line with the engine's live list.
///
/// Ids still reported keep their cached relative order, ids no longer reported
/// are dropped, and newly reported ids are appended in live order.
pub fn reconcile(cached: &mut Vec<String>, live: &[String]) -> Reconciliation {
    let before = cached.len();
    cached.retain(|id| live.contains(id));
    let removed = before - cached.len();

    let mut added = 0;
    for id in live {
        if !cached.contains(id) {
            cached.push(id.clone());
            added += 1;
        }
    }
    Reconciliation { added, removed }
}

// =============================================================================
// SESSION HANDLE
// =============================================================================

/// One tracked browser session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionHandle {
    synthetic_id: u64,
    alias: Option<String>,
    native_context_id: String,
    page_catalog: Vec<String>,
}

impl SessionHandle {
    /// Synthetic id
    #[must_use]
    pub const fn synthetic_id(&self) -> u64 {
        self.synthetic_id
    }

    /// Alias, if one was given at open time
    #[must_use]
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Engine context id
    #[must_use]
    pub fn native_context_id(&self) -> &str {
        &self.native_context_id
    }

    /// Cached page ids in catalog order
    #[must_use]
    pub fn page_catalog(&self) -> &[String] {
        &self.page_catalog
    }
}

// =============================================================================
// SESSION CATALOG
// =============================================================================

/// Translation table between synthetic session ids and engine contexts.
pub struct SessionCatalog {
    engine: Arc<dyn AutomationEngine>,
    next_id: u64,
    handles: BTreeMap<u64, SessionHandle>,
    aliases: HashMap<String, u64>,
}

impl fmt::Debug for SessionCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCatalog")
            .field("next_id", &self.next_id)
            .field("handles", &self.handles)
            .field("aliases", &self.aliases)
            .finish_non_exhaustive()
    }
}

impl SessionCatalog {
    /// Create an empty catalog over an engine
    #[must_use]
    pub fn new(engine: Arc<dyn AutomationEngine>) -> Self {
        Self {
            engine,
            next_id: 0,
            handles: BTreeMap::new(),
            aliases: HashMap::new(),
        }
    }

    /// Open a new context with one page and track it.
    ///
    /// The alias is checked before the engine is touched, so a rejected open
    /// leaves no stray context behind.
    ///
    /// # Errors
    ///
    /// [`CompatError::DuplicateAlias`] when the alias is taken,
    /// [`CompatError::InvalidArgument`] when it reads as `CURRENT` or `ALL`,
    /// or any engine error.
    pub fn open(&mut self, alias: Option<&str>, options: &ContextOptions) -> CompatResult<u64> {
        if let Some(alias) = alias {
            if matches!(SessionRef::parse(alias), SessionRef::Current | SessionRef::All) {
                return Err(CompatError::InvalidArgument {
                    message: format!("Alias '{alias}' is reserved"),
                });
            }
            if self.aliases.contains_key(alias) {
                return Err(CompatError::DuplicateAlias {
                    alias: alias.to_string(),
                });
            }
        }

        let opened = self.engine.new_context(options)?;
        let synthetic_id = self.next_id;
        self.next_id += 1;

        if let Some(alias) = alias {
            self.aliases.insert(alias.to_string(), synthetic_id);
        }
        self.handles.insert(
            synthetic_id,
            SessionHandle {
                synthetic_id,
                alias: alias.map(str::to_string),
                native_context_id: opened.context_id.clone(),
                page_catalog: vec![opened.page_id],
            },
        );
        tracing::debug!(synthetic_id, context = %opened.context_id, ?alias, "session opened");
        Ok(synthetic_id)
    }

    /// Engine context id for a session reference.
    ///
    /// `Current` asks the engine directly and does not consult the table.
    ///
    /// # Errors
    ///
    /// [`CompatError::WindowNotFound`] when an index or alias is not tracked.
    pub fn resolve(&self, identifier: &SessionRef) -> CompatResult<String> {
        match identifier {
            SessionRef::Current => self.engine.active_context(),
            SessionRef::All => Err(CompatError::InvalidArgument {
                message: "'ALL' does not name a single browser".to_string(),
            }),
            other => {
                let id = self.lookup(other)?;
                Ok(self.handles[&id].native_context_id.clone())
            }
        }
    }

    /// Reconciled page ids of one session, or of every session for `All`.
    ///
    /// For a specific session the engine's active context is switched
    /// temporarily and always switched back.
    ///
    /// # Errors
    ///
    /// [`CompatError::WindowNotFound`] for an untracked session, or any engine error.
    pub fn pages_for(&mut self, identifier: &SessionRef) -> CompatResult<Vec<String>> {
        match identifier {
            SessionRef::Current => self.current_pages(),
            SessionRef::All => self.all_pages(),
            other => {
                let id = self.lookup(other)?;
                let native = self.handles[&id].native_context_id.clone();
                let previous = self.engine.switch_context(&native)?;
                let pages = self.current_pages();
                if previous != native {
                    self.engine.switch_context(&previous)?;
                }
                pages
            }
        }
    }

    /// Close a session and forget it.
    ///
    /// Closing the last tracked session also shuts the engine down.
    ///
    /// # Errors
    ///
    /// [`CompatError::WindowNotFound`] for an untracked session, or any engine error.
    pub fn close(&mut self, identifier: &SessionRef) -> CompatResult<u64> {
        let id = match identifier {
            SessionRef::Current => self.current_id()?,
            other => self.lookup(other)?,
        };
        let native = self.handles[&id].native_context_id.clone();
        self.engine.close_context(&native)?;

        if let Some(handle) = self.handles.remove(&id) {
            if let Some(alias) = handle.alias {
                self.aliases.remove(&alias);
            }
        }
        tracing::debug!(synthetic_id = id, context = %native, "session closed");

        if self.handles.is_empty() {
            self.engine.shutdown()?;
            tracing::debug!("last session closed, engine shut down");
        }
        Ok(id)
    }

    /// Close every session and shut the engine down.
    ///
    /// # Errors
    ///
    /// Any engine error.
    pub fn close_all(&mut self) -> CompatResult<()> {
        self.engine.close_all_contexts()?;
        self.handles.clear();
        self.aliases.clear();
        self.engine.shutdown()?;
        tracing::debug!("all sessions closed");
        Ok(())
    }

    /// Activate a session, returning the synthetic id of the previously
    /// active one when it was tracked.
    ///
    /// # Errors
    ///
    /// [`CompatError::WindowNotFound`] for an untracked session, or any engine error.
    pub fn switch(&mut self, identifier: &SessionRef) -> CompatResult<Option<u64>> {
        let id = match identifier {
            SessionRef::Current => self.current_id()?,
            other => self.lookup(other)?,
        };
        let previous = self
            .engine
            .switch_context(&self.handles[&id].native_context_id)?;
        Ok(self.id_for_context(&previous))
    }

    /// Open synthetic ids in ascending order
    #[must_use]
    pub fn ids(&self) -> Vec<u64> {
        self.handles.keys().copied().collect()
    }

    /// Alias to synthetic id map
    #[must_use]
    pub fn aliases(&self) -> BTreeMap<String, u64> {
        self.aliases
            .iter()
            .map(|(alias, id)| (alias.clone(), *id))
            .collect()
    }

    /// Tracked handle by synthetic id
    #[must_use]
    pub fn handle(&self, synthetic_id: u64) -> Option<&SessionHandle> {
        self.handles.get(&synthetic_id)
    }

    /// Number of open sessions
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether no session is open
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Native id of the engine's active page
    ///
    /// # Errors
    ///
    /// Any engine error.
    pub fn current_page(&self) -> CompatResult<String> {
        self.engine.active_page()
    }

    /// Synthetic id tracking the given engine context
    #[must_use]
    pub fn id_for_context(&self, native_context_id: &str) -> Option<u64> {
        self.handles
            .values()
            .find(|h| h.native_context_id == native_context_id)
            .map(|h| h.synthetic_id)
    }

    // -------------------------------------------------------------------------

    fn lookup(&self, identifier: &SessionRef) -> CompatResult<u64> {
        let found = match identifier {
            SessionRef::Index { index, .. } if self.handles.contains_key(index) => Some(*index),
            SessionRef::Index { raw, .. } => self.aliases.get(raw).copied(),
            SessionRef::Alias(alias) => self.aliases.get(alias).copied(),
            SessionRef::Current | SessionRef::All => None,
        };
        found.ok_or_else(|| CompatError::WindowNotFound {
            identifier: identifier.to_string(),
        })
    }

    fn current_id(&self) -> CompatResult<u64> {
        let active = self.engine.active_context()?;
        self.id_for_context(&active)
            .ok_or_else(|| CompatError::WindowNotFound {
                identifier: SessionRef::Current.to_string(),
            })
    }

    fn current_pages(&mut self) -> CompatResult<Vec<String>> {
        let id = self.current_id()?;
        let live = self.engine.page_ids()?;
        let Some(handle) = self.handles.get_mut(&id) else {
            return Err(CompatError::WindowNotFound {
                identifier: id.to_string(),
            });
        };
        let delta = reconcile(&mut handle.page_catalog, &live);
        if !delta.is_unchanged() {
            tracing::trace!(synthetic_id = id, added = delta.added, removed = delta.removed, "pages reconciled");
        }
        Ok(handle.page_catalog.clone())
    }

    fn all_pages(&mut self) -> CompatResult<Vec<String>> {
        let snapshots = self.engine.catalog()?;
        let mut pages = Vec::new();
        for handle in self.handles.values_mut() {
            let live: Vec<String> = snapshots
                .iter()
                .find(|c| c.id == handle.native_context_id)
                .map(|c| c.pages.iter().map(|p| p.id.clone()).collect())
                .unwrap_or_default();
            reconcile(&mut handle.page_catalog, &live);
            pages.extend(handle.page_catalog.iter().cloned());
        }
        Ok(pages)
    }
}

// =============================================================================
// TESTS
// =============================================================================
