use crate::{AuthzError, AuthzResult};
use serde::{Deserialize, Serialize};

/// Compile-time page catalog.
///
/// Variant order is catalog order; listings and the access matrix use it.
/// Serialized as the page key (`"/blog/[id]"`), never as the variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Page {
    #[serde(rename = "/admin")]
    Admin,
    #[serde(rename = "/editor")]
    Editor,
    #[serde(rename = "/dashboard")]
    Dashboard,
    #[serde(rename = "/blog")]
    Blog,
    #[serde(rename = "/blog/create")]
    BlogCreate,
    #[serde(rename = "/blog/[id]")]
    BlogItem,
    #[serde(rename = "/blog/[id]/edit")]
    BlogItemEdit,
    #[serde(rename = "/profile")]
    Profile,
}

impl Page {
    pub const ALL: [Page; 8] = [
        Page::Admin,
        Page::Editor,
        Page::Dashboard,
        Page::Blog,
        Page::BlogCreate,
        Page::BlogItem,
        Page::BlogItemEdit,
        Page::Profile,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Page::Admin => "/admin",
            Page::Editor => "/editor",
            Page::Dashboard => "/dashboard",
            Page::Blog => "/blog",
            Page::BlogCreate => "/blog/create",
            Page::BlogItem => "/blog/[id]",
            Page::BlogItemEdit => "/blog/[id]/edit",
            Page::Profile => "/profile",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Page::Admin => "Admin Dashboard",
            Page::Editor => "Editor Dashboard",
            Page::Dashboard => "User Dashboard",
            Page::Blog => "Blog List",
            Page::BlogCreate => "Create Blog",
            Page::BlogItem => "View Blog",
            Page::BlogItemEdit => "Edit Blog",
            Page::Profile => "User Profile",
        }
    }

    /// True for pages whose key contains a dynamic segment.
    pub fn is_dynamic(self) -> bool {
        self.path().contains('[')
    }

    pub fn parse_key(value: &str) -> AuthzResult<Self> {
        value.parse()
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

impl std::str::FromStr for Page {
    type Err = AuthzError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Page::ALL
            .into_iter()
            .find(|page| page.path() == value)
            .ok_or_else(|| AuthzError::InvalidPage(value.to_string()))
    }
}
