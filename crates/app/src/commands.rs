//! Shell command parsing
//!
//! One command per line. Words are split on whitespace; trailing free text
//! (titles, names, vote values) keeps its inner spacing collapsed to single
//! spaces.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use gather_core::{DishStatus, EventStatus, EventType, RsvpStatus};
use thiserror::Error;
use uuid::Uuid;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command '{0}', try 'help'")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("invalid {what}: {value}")]
    Invalid { what: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Draft(EventType),
    Title(String),
    Date(DateTime<Utc>),
    Commit,
    Load(Uuid),
    Guest(String),
    Unguest(Uuid),
    Rsvp(Uuid, RsvpStatus),
    Vote { category: String, value: String },
    Lock,
    Decide(serde_json::Value),
    Picks(BTreeMap<String, String>),
    Decider(Option<Uuid>),
    AddDish { category: String, name: String },
    RemoveDish(Uuid),
    MarkDish(Uuid, DishStatus),
    Claim { dish_id: Uuid, name: String },
    Unclaim(Uuid),
    AddRole { person: String, role: String, tasks: Vec<String> },
    RemoveRole(Uuid),
    Status(EventStatus),
    Next,
    Cancel,
    Share,
    Show,
    Mine,
    Help,
    Quit,
}

pub const HELP: &str = "\
draft <roast|party|potluck>        start a new event draft
title <text>                       set the draft title
date <YYYY-MM-DD HH:MM>            set the draft date (UTC)
commit                             save the draft as a planning event
load <event-id>                    make an event active
guest <name>                       add a guest
unguest <guest-id>                 remove a guest
rsvp <guest-id> <status>           invited, confirmed, declined or maybe
vote <category> <value>            cast a vote
lock                               tally votes and lock the menu
decide <json>                      lock the menu with a decider's pick
picks <json>                       lock with per-category picks, tally for the rest
decider <user-id|none>             delegate the final decision
dish add <category> <name>         put a dish on the potluck board
dish remove <dish-id>              take a dish off the board
dish mark <dish-id> <status>       prepping, ready or dropped
claim <dish-id> [name]             claim an open dish
unclaim <dish-id>                  hand a dish back
role add <person> <role> [tasks]   assign a role, tasks separated by ';'
role remove <role-id>              remove a role
status <status>                    move the event to a status
next                               advance to the next status
cancel                             cancel the event
share                              print the invitation link
show                               print the active event
mine                               list events you host or are invited to
help                               show this help
quit                               leave the shell";

/// Parse one input line; blank lines yield `None`
pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match head.to_ascii_lowercase().as_str() {
        "draft" => Command::Draft(parse_arg(&args, 0, "draft <roast|party|potluck>", "event type")?),
        "title" => Command::Title(rest(&args, 0, "title <text>")?),
        "date" => Command::Date(parse_date(&rest(&args, 0, "date <YYYY-MM-DD HH:MM>")?)?),
        "commit" => Command::Commit,
        "load" => Command::Load(parse_id(&args, 0, "load <event-id>")?),
        "guest" => Command::Guest(rest(&args, 0, "guest <name>")?),
        "unguest" => Command::Unguest(parse_id(&args, 0, "unguest <guest-id>")?),
        "rsvp" => {
            const USAGE: &str = "rsvp <guest-id> <status>";
            Command::Rsvp(parse_id(&args, 0, USAGE)?, parse_arg(&args, 1, USAGE, "rsvp")?)
        }
        "vote" => {
            const USAGE: &str = "vote <category> <value>";
            Command::Vote {
                category: word(&args, 0, USAGE)?.to_string(),
                value: rest(&args, 1, USAGE)?,
            }
        }
        "lock" => Command::Lock,
        "decide" => {
            let text = rest(&args, 0, "decide <json>")?;
            let payload = serde_json::from_str(&text).map_err(|_| ParseError::Invalid {
                what: "json",
                value: text,
            })?;
            Command::Decide(payload)
        }
        "picks" => {
            let text = rest(&args, 0, r#"picks {"category": "value"}"#)?;
            let picks = serde_json::from_str(&text).map_err(|_| ParseError::Invalid {
                what: "picks",
                value: text,
            })?;
            Command::Picks(picks)
        }
        "decider" => match word(&args, 0, "decider <user-id|none>")? {
            "none" => Command::Decider(None),
            _ => Command::Decider(Some(parse_id(&args, 0, "decider <user-id|none>")?)),
        },
        "dish" => parse_dish(&args)?,
        "claim" => {
            const USAGE: &str = "claim <dish-id> [name]";
            Command::Claim {
                dish_id: parse_id(&args, 0, USAGE)?,
                name: args.get(1..).map(|a| a.join(" ")).unwrap_or_default(),
            }
        }
        "unclaim" => Command::Unclaim(parse_id(&args, 0, "unclaim <dish-id>")?),
        "role" => parse_role(&args)?,
        "status" => Command::Status(parse_arg(&args, 0, "status <status>", "status")?),
        "next" => Command::Next,
        "cancel" => Command::Cancel,
        "share" => Command::Share,
        "show" => Command::Show,
        "mine" => Command::Mine,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn parse_dish(args: &[&str]) -> Result<Command, ParseError> {
    const USAGE: &str = "dish add <category> <name> | dish remove <id> | dish mark <id> <status>";
    match word(args, 0, USAGE)? {
        "add" => Ok(Command::AddDish {
            category: word(args, 1, USAGE)?.to_string(),
            name: rest(args, 2, USAGE)?,
        }),
        "remove" => Ok(Command::RemoveDish(parse_id(args, 1, USAGE)?)),
        "mark" => Ok(Command::MarkDish(
            parse_id(args, 1, USAGE)?,
            parse_arg(args, 2, USAGE, "dish status")?,
        )),
        _ => Err(ParseError::Usage(USAGE)),
    }
}

fn parse_role(args: &[&str]) -> Result<Command, ParseError> {
    const USAGE: &str = "role add <person> <role> [task; task] | role remove <id>";
    match word(args, 0, USAGE)? {
        "add" => {
            let tasks = args
                .get(3..)
                .map(|a| a.join(" "))
                .unwrap_or_default()
                .split(';')
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect();
            Ok(Command::AddRole {
                person: word(args, 1, USAGE)?.to_string(),
                role: word(args, 2, USAGE)?.to_string(),
                tasks,
            })
        }
        "remove" => Ok(Command::RemoveRole(parse_id(args, 1, USAGE)?)),
        _ => Err(ParseError::Usage(USAGE)),
    }
}

fn word<'a>(args: &[&'a str], index: usize, usage: &'static str) -> Result<&'a str, ParseError> {
    args.get(index).copied().ok_or(ParseError::Usage(usage))
}

fn rest(args: &[&str], from: usize, usage: &'static str) -> Result<String, ParseError> {
    match args.get(from..) {
        Some(words) if !words.is_empty() => Ok(words.join(" ")),
        _ => Err(ParseError::Usage(usage)),
    }
}

fn parse_id(args: &[&str], index: usize, usage: &'static str) -> Result<Uuid, ParseError> {
    let text = word(args, index, usage)?;
    Uuid::parse_str(text).map_err(|_| ParseError::Invalid {
        what: "id",
        value: text.to_string(),
    })
}

fn parse_arg<T: std::str::FromStr>(
    args: &[&str],
    index: usize,
    usage: &'static str,
    what: &'static str,
) -> Result<T, ParseError> {
    let text = word(args, index, usage)?;
    text.to_ascii_lowercase()
        .parse()
        .map_err(|_| ParseError::Invalid {
            what,
            value: text.to_string(),
        })
}

fn parse_date(text: &str) -> Result<DateTime<Utc>, ParseError> {
    NaiveDateTime::parse_from_str(text, DATE_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| ParseError::Invalid {
            what: "date",
            value: text.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    fn parsed(line: &str) -> Command {
        parse(line).unwrap().unwrap()
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        assert_eq!(parse("   "), Ok(None));
    }

    #[test]
    fn test_draft_and_title() {
        assert_eq!(parsed("draft Potluck"), Command::Draft(EventType::Potluck));
        assert_eq!(
            parsed("title   Sunday   Family Dinner "),
            Command::Title("Sunday Family Dinner".into())
        );
        assert!(matches!(parse("draft brunch"), Err(ParseError::Invalid { .. })));
        assert_eq!(parse("title"), Err(ParseError::Usage("title <text>")));
    }

    #[test]
    fn test_date_is_utc() {
        let Command::Date(date) = parsed("date 2026-10-25 13:30") else {
            panic!("expected a date");
        };
        assert_eq!((date.year(), date.month(), date.day()), (2026, 10, 25));
        assert_eq!((date.hour(), date.minute()), (13, 30));
        assert!(matches!(parse("date tomorrow"), Err(ParseError::Invalid { .. })));
    }

    #[test]
    fn test_votes_keep_multi_word_values() {
        assert_eq!(
            parsed("vote dessert sticky toffee pudding"),
            Command::Vote {
                category: "dessert".into(),
                value: "sticky toffee pudding".into(),
            }
        );
        assert!(matches!(parse("vote dessert"), Err(ParseError::Usage(_))));
    }

    #[test]
    fn test_decide_takes_json() {
        assert_eq!(
            parsed(r#"decide {"protein": "Beef"}"#),
            Command::Decide(json!({ "protein": "Beef" }))
        );
        assert!(matches!(parse("decide beef"), Err(ParseError::Invalid { .. })));
    }

    #[test]
    fn test_picks_map_categories_to_values() {
        assert_eq!(
            parsed(r#"picks {"protein": "Beef", "side": "Greens"}"#),
            Command::Picks(BTreeMap::from([
                ("protein".to_string(), "Beef".to_string()),
                ("side".to_string(), "Greens".to_string()),
            ]))
        );
        assert!(matches!(
            parse(r#"picks {"protein": 3}"#),
            Err(ParseError::Invalid { what: "picks", .. })
        ));
    }

    #[test]
    fn test_dish_subcommands() {
        let id = Uuid::new_v4();
        assert_eq!(
            parsed("dish add Main Lasagna al forno"),
            Command::AddDish {
                category: "Main".into(),
                name: "Lasagna al forno".into(),
            }
        );
        assert_eq!(parsed(&format!("dish remove {id}")), Command::RemoveDish(id));
        assert_eq!(
            parsed(&format!("dish mark {id} READY")),
            Command::MarkDish(id, DishStatus::Ready)
        );
        assert!(matches!(parse("dish eat"), Err(ParseError::Usage(_))));
    }

    #[test]
    fn test_claim_name_is_optional() {
        let id = Uuid::new_v4();
        assert_eq!(
            parsed(&format!("claim {id}")),
            Command::Claim { dish_id: id, name: String::new() }
        );
        assert_eq!(
            parsed(&format!("claim {id} Ben and Cleo")),
            Command::Claim { dish_id: id, name: "Ben and Cleo".into() }
        );
        assert!(matches!(parse("claim lasagna"), Err(ParseError::Invalid { .. })));
    }

    #[test]
    fn test_role_tasks_split_on_semicolons() {
        assert_eq!(
            parsed("role add Ben Grill light the coals; flip burgers;"),
            Command::AddRole {
                person: "Ben".into(),
                role: "Grill".into(),
                tasks: vec!["light the coals".into(), "flip burgers".into()],
            }
        );
        assert_eq!(
            parsed("role add Cleo Drinks"),
            Command::AddRole {
                person: "Cleo".into(),
                role: "Drinks".into(),
                tasks: vec![],
            }
        );
    }

    #[test]
    fn test_status_and_rsvp_values() {
        let id = Uuid::new_v4();
        assert_eq!(
            parsed("status dish_claiming"),
            Command::Status(EventStatus::DishClaiming)
        );
        assert_eq!(
            parsed(&format!("rsvp {id} confirmed")),
            Command::Rsvp(id, RsvpStatus::Confirmed)
        );
        assert_eq!(parsed("decider none"), Command::Decider(None));
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(parse("bake 200"), Err(ParseError::Unknown("bake".into())));
        assert_eq!(parsed("EXIT"), Command::Quit);
    }
}
