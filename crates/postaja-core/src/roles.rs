//! Team roles and the capabilities each one grants.
//!
//! A static table; checking a capability is plain set membership.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Operator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    #[serde(rename = "view:dashboard")]
    ViewDashboard,
    #[serde(rename = "view:products")]
    ViewProducts,
    #[serde(rename = "edit:products")]
    EditProducts,
    #[serde(rename = "view:posts")]
    ViewPosts,
    #[serde(rename = "edit:posts")]
    EditPosts,
    #[serde(rename = "view:calendar")]
    ViewCalendar,
    #[serde(rename = "edit:calendar")]
    EditCalendar,
    #[serde(rename = "view:autopilot")]
    ViewAutopilot,
    #[serde(rename = "edit:autopilot")]
    EditAutopilot,
    #[serde(rename = "view:insights")]
    ViewInsights,
    #[serde(rename = "view:inbox")]
    ViewInbox,
    #[serde(rename = "reply:inbox")]
    ReplyInbox,
    #[serde(rename = "view:settings")]
    ViewSettings,
    #[serde(rename = "edit:settings")]
    EditSettings,
    #[serde(rename = "view:billing")]
    ViewBilling,
    #[serde(rename = "edit:billing")]
    EditBilling,
    #[serde(rename = "manage:team")]
    ManageTeam,
}

use Capability::*;

const ADMIN: &[Capability] = &[
    ViewDashboard,
    ViewProducts,
    EditProducts,
    ViewPosts,
    EditPosts,
    ViewCalendar,
    EditCalendar,
    ViewAutopilot,
    EditAutopilot,
    ViewInsights,
    ViewInbox,
    ReplyInbox,
    ViewSettings,
    EditSettings,
    ViewBilling,
    EditBilling,
    ManageTeam,
];

const MANAGER: &[Capability] = &[
    ViewDashboard,
    ViewProducts,
    EditProducts,
    ViewPosts,
    EditPosts,
    ViewCalendar,
    EditCalendar,
    ViewAutopilot,
    EditAutopilot,
    ViewInsights,
    ViewInbox,
    ReplyInbox,
    ViewSettings,
    EditSettings,
];

const OPERATOR: &[Capability] = &[
    ViewDashboard,
    ViewProducts,
    ViewPosts,
    EditPosts,
    ViewCalendar,
    ViewInbox,
    ReplyInbox,
];

impl Role {
    pub fn capabilities(&self) -> &'static [Capability] {
        match self {
            Role::Admin => ADMIN,
            Role::Manager => MANAGER,
            Role::Operator => OPERATOR,
        }
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Operator => "operator",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "operator" => Ok(Role::Operator),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Capability {
    pub fn tag(&self) -> &'static str {
        match self {
            ViewDashboard => "view:dashboard",
            ViewProducts => "view:products",
            EditProducts => "edit:products",
            ViewPosts => "view:posts",
            EditPosts => "edit:posts",
            ViewCalendar => "view:calendar",
            EditCalendar => "edit:calendar",
            ViewAutopilot => "view:autopilot",
            EditAutopilot => "edit:autopilot",
            ViewInsights => "view:insights",
            ViewInbox => "view:inbox",
            ReplyInbox => "reply:inbox",
            ViewSettings => "view:settings",
            EditSettings => "edit:settings",
            ViewBilling => "view:billing",
            EditBilling => "edit:billing",
            ManageTeam => "manage:team",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
