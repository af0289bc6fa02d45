//! Admin-console modules: groups of pages edited as one unit.
//!
//! # Purpose
//! A module shares a single capability surface across its pages. Setting a
//! capability on a module writes it to every page; checking a capability on a
//! module requires it on every page.
//!
//! # Key invariants
//! - Every module has at least one page.
//! - A page belongs to at most one module.
//! - Only the capabilities in [`Module::capabilities`] may be toggled.
use crate::{AuthzError, AuthzResult, Capability, Page};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Module {
    Profile,
    Blog,
    Dashboard,
    Admin,
}

impl Module {
    pub const ALL: [Module; 4] = [Module::Profile, Module::Blog, Module::Dashboard, Module::Admin];

    pub fn as_str(self) -> &'static str {
        match self {
            Module::Profile => "profile",
            Module::Blog => "blog",
            Module::Dashboard => "dashboard",
            Module::Admin => "admin",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Module::Profile => "Profile",
            Module::Blog => "Blog",
            Module::Dashboard => "Dashboard",
            Module::Admin => "Admin",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Module::Profile => "User Profile",
            Module::Blog => "Blog Management",
            Module::Dashboard => "User & Editor Dashboards",
            Module::Admin => "Admin Dashboard",
        }
    }

    pub fn pages(self) -> &'static [Page] {
        match self {
            Module::Profile => &[Page::Profile],
            Module::Blog => &[
                Page::Blog,
                Page::BlogCreate,
                Page::BlogItem,
                Page::BlogItemEdit,
            ],
            Module::Dashboard => &[Page::Dashboard, Page::Editor],
            Module::Admin => &[Page::Admin],
        }
    }

    pub fn capabilities(self) -> &'static [Capability] {
        match self {
            Module::Profile => &[Capability::View, Capability::Edit],
            Module::Blog => &Capability::ALL,
            Module::Dashboard | Module::Admin => &[Capability::View],
        }
    }

    pub fn supports(self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    pub fn ensure_supports(self, capability: Capability) -> AuthzResult<()> {
        if self.supports(capability) {
            return Ok(());
        }
        Err(AuthzError::UnsupportedCapability {
            module: self.as_str().to_string(),
            capability: capability.as_str().to_string(),
        })
    }

    /// Module that owns `page`.
    pub fn of_page(page: Page) -> Option<Module> {
        Module::ALL
            .into_iter()
            .find(|module| module.pages().contains(&page))
    }
}

impl std::fmt::Display for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Module {
    type Err = AuthzError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Module::ALL
            .into_iter()
            .find(|module| module.as_str() == value)
            .ok_or_else(|| AuthzError::InvalidModule(value.to_string()))
    }
}
