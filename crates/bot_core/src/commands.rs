use std::collections::HashMap;

use shared::domain::{DevlogId, ProjectId, StoreItemId, UserId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Project { project_id: ProjectId },
    Projects { query: String, page: u32 },
    Devlog { devlog_id: DevlogId },
    User { user_id: UserId },
    Users { query: String, page: u32 },
    Store,
    StoreItem { item_id: StoreItemId },
    Devlogs { page: u32 },
}

/// A typed option value as the platform delivered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Integer(i64),
    String(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command `{0}`")]
    Unknown(String),
    #[error("missing option `{0}`")]
    MissingOption(&'static str),
    #[error("option `{0}` has the wrong type")]
    InvalidOption(&'static str),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Project { .. } => "project",
            Command::Projects { .. } => "projects",
            Command::Devlog { .. } => "devlog",
            Command::User { .. } => "user",
            Command::Users { .. } => "users",
            Command::Store => "store",
            Command::StoreItem { .. } => "store_item",
            Command::Devlogs { .. } => "devlogs",
        }
    }

    pub fn from_invocation(
        name: &str,
        options: &HashMap<String, OptionValue>,
    ) -> Result<Self, CommandError> {
        let args = Options(options);
        Ok(match name {
            "project" => Command::Project {
                project_id: ProjectId(args.integer("project_id")?),
            },
            "projects" => Command::Projects {
                query: args.string("query")?,
                page: args.page()?,
            },
            "devlog" => Command::Devlog {
                devlog_id: DevlogId(args.integer("devlog_id")?),
            },
            "user" => Command::User {
                user_id: UserId(args.integer("user_id")?),
            },
            "users" => Command::Users {
                query: args.string("query")?,
                page: args.page()?,
            },
            "store" => Command::Store,
            "store_item" => Command::StoreItem {
                item_id: StoreItemId(args.integer("item_id")?),
            },
            "devlogs" => Command::Devlogs { page: args.page()? },
            other => return Err(CommandError::Unknown(other.to_string())),
        })
    }
}

struct Options<'a>(&'a HashMap<String, OptionValue>);

impl Options<'_> {
    fn integer(&self, name: &'static str) -> Result<i64, CommandError> {
        match self.0.get(name) {
            Some(OptionValue::Integer(value)) => Ok(*value),
            Some(OptionValue::String(raw)) => raw
                .trim()
                .parse()
                .map_err(|_| CommandError::InvalidOption(name)),
            None => Err(CommandError::MissingOption(name)),
        }
    }

    fn string(&self, name: &'static str) -> Result<String, CommandError> {
        match self.0.get(name) {
            Some(OptionValue::String(value)) => Ok(value.clone()),
            Some(OptionValue::Integer(value)) => Ok(value.to_string()),
            None => Err(CommandError::MissingOption(name)),
        }
    }

    fn page(&self) -> Result<u32, CommandError> {
        if !self.0.contains_key("page") {
            return Ok(1);
        }
        let page = self.integer("page")?;
        Ok(page.clamp(1, i64::from(u32::MAX)) as u32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Integer,
    String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: OptionKind,
    pub required: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub options: &'static [OptionSpec],
}

const fn required(name: &'static str, description: &'static str, kind: OptionKind) -> OptionSpec {
    OptionSpec {
        name,
        description,
        kind,
        required: true,
    }
}

const PAGE: OptionSpec = OptionSpec {
    name: "page",
    description: "Page number (default 1)",
    kind: OptionKind::Integer,
    required: false,
};

/// Slash commands the bot registers with the platform.
pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "project",
        description: "Get a project by ID",
        options: &[required("project_id", "Project ID", OptionKind::Integer)],
    },
    CommandSpec {
        name: "projects",
        description: "Search for projects",
        options: &[required("query", "Search text", OptionKind::String), PAGE],
    },
    CommandSpec {
        name: "devlog",
        description: "Get a devlog by ID",
        options: &[required("devlog_id", "Devlog ID", OptionKind::Integer)],
    },
    CommandSpec {
        name: "user",
        description: "Get user info by ID",
        options: &[required("user_id", "User ID", OptionKind::Integer)],
    },
    CommandSpec {
        name: "users",
        description: "Search for users",
        options: &[required("query", "Search text", OptionKind::String), PAGE],
    },
    CommandSpec {
        name: "store",
        description: "Get store items",
        options: &[],
    },
    CommandSpec {
        name: "store_item",
        description: "Get a store item by ID",
        options: &[required("item_id", "Store item ID", OptionKind::Integer)],
    },
    CommandSpec {
        name: "devlogs",
        description: "Get recent devlogs",
        options: &[PAGE],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn options(pairs: &[(&str, OptionValue)]) -> HashMap<String, OptionValue> {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn parses_every_registered_command() {
        let all = options(&[
            ("project_id", OptionValue::Integer(1)),
            ("devlog_id", OptionValue::Integer(2)),
            ("user_id", OptionValue::Integer(3)),
            ("item_id", OptionValue::Integer(4)),
            ("query", OptionValue::String("oven".into())),
        ]);
        for spec in COMMANDS {
            let command = Command::from_invocation(spec.name, &all).expect(spec.name);
            assert_eq!(command.name(), spec.name);
        }
    }

    #[test]
    fn page_defaults_to_one_and_never_drops_below() {
        let query = ("query", OptionValue::String("x".into()));
        assert_eq!(
            Command::from_invocation("projects", &options(&[query.clone()])),
            Ok(Command::Projects {
                query: "x".into(),
                page: 1
            })
        );
        assert_eq!(
            Command::from_invocation(
                "users",
                &options(&[query, ("page", OptionValue::Integer(-4))])
            ),
            Ok(Command::Users {
                query: "x".into(),
                page: 1
            })
        );
        assert_eq!(
            Command::from_invocation("devlogs", &options(&[("page", OptionValue::Integer(7))])),
            Ok(Command::Devlogs { page: 7 })
        );
    }

    #[test]
    fn reports_bad_invocations() {
        assert_eq!(
            Command::from_invocation("project", &HashMap::new()),
            Err(CommandError::MissingOption("project_id"))
        );
        assert_eq!(
            Command::from_invocation(
                "user",
                &options(&[("user_id", OptionValue::String("abc".into()))])
            ),
            Err(CommandError::InvalidOption("user_id"))
        );
        assert_eq!(
            Command::from_invocation("bake", &HashMap::new()),
            Err(CommandError::Unknown("bake".into()))
        );
    }
}
