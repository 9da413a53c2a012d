//! Interactive shell driving one [`EventSession`]

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::io::{self, BufRead, Write};

use gather_core::{tally, EventProjection, EventSession, NewGuest, Result, SocialEvent, Storage};
use tracing::debug;

use crate::commands::{self, Command, HELP};
use crate::console::Notices;

pub struct Shell<'a, S: Storage> {
    session: EventSession<'a, S>,
    notices: Notices,
}

impl<'a, S: Storage> Shell<'a, S> {
    pub fn new(session: EventSession<'a, S>, notices: Notices) -> Self {
        Self { session, notices }
    }

    /// Read commands until `quit` or end of input
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        write!(output, "{}", self.prompt())?;
        output.flush()?;

        for line in input.lines() {
            let line = line?;
            let command = match commands::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => {
                    write!(output, "{}", self.prompt())?;
                    output.flush()?;
                    continue;
                }
                Err(e) => {
                    writeln!(output, "{e}")?;
                    write!(output, "{}", self.prompt())?;
                    output.flush()?;
                    continue;
                }
            };
            if command == Command::Quit {
                break;
            }

            debug!(?command, "Running command");
            match self.execute(command) {
                Ok(reply) if reply.is_empty() => {}
                Ok(reply) => writeln!(output, "{reply}")?,
                Err(e) => writeln!(output, "error: {e}")?,
            }
            for notice in self.notices.drain() {
                writeln!(output, "{notice}")?;
            }
            write!(output, "{}", self.prompt())?;
            output.flush()?;
        }
        writeln!(output)?;
        Ok(())
    }

    fn prompt(&self) -> String {
        match self.session.key() {
            Some((event_type, status)) => format!("gather [{event_type}:{status}]> "),
            None if self.session.draft().is_some() => "gather [draft]> ".to_string(),
            None => "gather> ".to_string(),
        }
    }

    pub fn execute(&mut self, command: Command) -> Result<String> {
        let session = &mut self.session;
        let reply = match command {
            Command::Draft(event_type) => {
                let draft = session.create_draft(event_type);
                format!(
                    "Drafting a {} for {} guests",
                    event_type.display_name(),
                    draft.expected_guests
                )
            }
            Command::Title(title) => {
                session.draft_mut()?.title = title;
                String::new()
            }
            Command::Date(date) => {
                session.draft_mut()?.date_time = Some(date);
                String::new()
            }
            Command::Commit => format!("Created event {}", session.commit_draft()?),
            Command::Load(event_id) => {
                let screen = session.load_event(event_id)?;
                format!("Loaded {event_id}, opening {screen:?}")
            }
            Command::Guest(name) => format!("Added guest {}", session.add_guest(NewGuest::named(name))?),
            Command::Unguest(guest_id) => {
                session.remove_guest(guest_id)?;
                "Guest removed".to_string()
            }
            Command::Rsvp(guest_id, rsvp) => {
                session.update_rsvp(guest_id, rsvp)?;
                format!("RSVP set to {rsvp}")
            }
            Command::Vote { category, value } => {
                session.cast_vote(&category, &value)?;
                format!("Voted {value} for {category}")
            }
            Command::Lock => {
                let result = session.lock_voting()?;
                let mut reply = String::from("Menu locked");
                for (category, outcome) in &result {
                    let _ = write!(reply, "\n  {category}: {} ({})", outcome.winner, outcome.count);
                }
                reply
            }
            Command::Decide(payload) => {
                session.decide(payload)?;
                "Menu decided".to_string()
            }
            Command::Picks(picks) => {
                let result = session.decide_picks(&picks, &BTreeMap::new())?;
                let mut reply = String::from("Menu decided");
                for (category, outcome) in &result {
                    let _ = write!(reply, "\n  {category}: {}", outcome.winner);
                }
                reply
            }
            Command::Decider(decider_id) => {
                session.set_decider(decider_id)?;
                match decider_id {
                    Some(id) => format!("Decider set to {id}"),
                    None => "The host decides".to_string(),
                }
            }
            Command::AddDish { category, name } => {
                format!("Added dish {}", session.add_dish(&category, &name, None)?)
            }
            Command::RemoveDish(dish_id) => {
                session.remove_dish(dish_id)?;
                "Dish removed".to_string()
            }
            Command::MarkDish(dish_id, status) => {
                session.set_dish_status(dish_id, status)?;
                format!("Dish marked {status}")
            }
            Command::Claim { dish_id, name } => {
                session.claim_dish(dish_id, &name)?;
                "Dish claimed".to_string()
            }
            Command::Unclaim(dish_id) => {
                session.unclaim_dish(dish_id)?;
                "Dish is open again".to_string()
            }
            Command::AddRole { person, role, tasks } => {
                format!("Assigned role {}", session.assign_role(&person, &role, tasks)?)
            }
            Command::RemoveRole(role_id) => {
                session.remove_role(role_id)?;
                "Role removed".to_string()
            }
            Command::Status(status) => {
                session.update_status(status)?;
                format!("Status is now {status}")
            }
            Command::Next => format!("Status is now {}", session.advance()?),
            Command::Cancel => {
                session.cancel_event()?;
                "Event cancelled".to_string()
            }
            Command::Share => {
                let link = session.share_link()?;
                format!("{}\n{}", link.message, link.url)
            }
            Command::Show => match session.active() {
                Some(projection) => render_projection(projection),
                None => "No active event".to_string(),
            },
            Command::Mine => {
                let hosted = session.hosted_events()?;
                let invited = session.invited_events()?;
                let mut reply = String::from("Hosting:");
                render_event_list(&mut reply, &hosted);
                reply.push_str("\nInvited to:");
                render_event_list(&mut reply, &invited);
                reply
            }
            Command::Help => HELP.to_string(),
            Command::Quit => String::new(),
        };
        Ok(reply)
    }
}

fn render_event_list(out: &mut String, events: &[SocialEvent]) {
    if events.is_empty() {
        out.push_str(" none");
    }
    for event in events {
        let _ = write!(
            out,
            "\n  {} {} ({}, {})",
            event.id,
            event.title,
            event.event_type.display_name(),
            event.status
        );
    }
}

fn render_projection(projection: &EventProjection) -> String {
    let event = &projection.event;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({}) is {}",
        event.title,
        event.event_type.display_name(),
        event.status
    );
    let _ = writeln!(out, "  id: {}", event.id);
    let _ = writeln!(
        out,
        "  host: {}, {} at {}",
        event.host_name,
        event.date_time.format("%Y-%m-%d %H:%M"),
        event.location.as_deref().unwrap_or("TBD")
    );

    let _ = writeln!(out, "Guests ({}):", projection.guests.len());
    for guest in &projection.guests {
        let _ = writeln!(out, "  {} {} - {}", guest.id, guest.name, guest.rsvp);
    }

    if !projection.votes.is_empty() {
        let _ = writeln!(out, "Votes ({}):", projection.votes.len());
        for (category, outcome) in tally(&projection.votes) {
            let counts: Vec<String> = outcome
                .all_counts
                .iter()
                .map(|(value, count)| format!("{value} {count}"))
                .collect();
            let _ = writeln!(out, "  {category}: {}", counts.join(", "));
        }
    }

    if !projection.dishes.is_empty() {
        let _ = writeln!(out, "Dishes:");
        for dish in &projection.dishes {
            let owner = dish
                .assigned_name
                .as_deref()
                .map(|name| format!(" by {name}"))
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "  {} [{}] {} - {}{}",
                dish.id, dish.category, dish.name, dish.status, owner
            );
        }
    }

    if !projection.roles.is_empty() {
        let _ = writeln!(out, "Roles:");
        for role in &projection.roles {
            let _ = writeln!(
                out,
                "  {} {}: {} ({})",
                role.id,
                role.person_name,
                role.role_name,
                role.tasks.join("; ")
            );
        }
    }

    if let Some(menu) = &event.menu_selected {
        let _ = writeln!(out, "Menu: {menu}");
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console;
    use gather_core::{Actor, Database, EventRepository, EventStatus};
    use std::io::Cursor;
    use uuid::Uuid;

    fn shell<'a>(db: &'a Database, name: &str) -> (Shell<'a, Database>, Uuid) {
        let notices = Notices::default();
        let actor = Actor::new(Uuid::new_v4(), name);
        let actor_id = actor.id;
        let session = EventSession::new(db, actor).with_collaborators(console::collaborators(&notices));
        (Shell::new(session, notices), actor_id)
    }

    fn run(shell: &mut Shell<'_, Database>, script: &str) -> String {
        let mut output = Vec::new();
        shell.run(Cursor::new(script), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    fn created_id(output: &str) -> Uuid {
        let line = output
            .lines()
            .find_map(|l| l.split("Created event ").nth(1))
            .unwrap();
        Uuid::parse_str(line.trim()).unwrap()
    }

    #[test]
    fn test_roast_script_locks_menu() {
        let db = Database::open_in_memory().unwrap();
        let (mut shell, _) = shell(&db, "Ana");

        let output = run(
            &mut shell,
            "draft roast\n\
             title Family Dinner\n\
             date 2026-10-25 13:00\n\
             commit\n\
             vote protein Chicken\n\
             vote protein Chicken\n\
             vote protein Lamb\n\
             lock\n",
        );

        assert!(output.contains("feed: Family Dinner (Sunday Roast)"));
        assert!(output.contains("protein: Chicken (2)"));
        assert!(output.contains("companion: Voting is closed."));
        assert!(output.contains("gather [roast:locked]> "));

        let event_id = created_id(&output);
        let stored = db.find_event_by_id(event_id).unwrap().unwrap();
        assert_eq!(stored.status, EventStatus::Locked);
    }

    #[test]
    fn test_errors_keep_the_shell_running() {
        let db = Database::open_in_memory().unwrap();
        let (mut shell, _) = shell(&db, "Ana");

        let output = run(&mut shell, "lock\nbake bread\ncommit\nhelp\nquit\nshow\n");

        assert!(output.contains("error: No active event"));
        assert!(output.contains("unknown command 'bake'"));
        assert!(output.contains("error: No draft open"));
        assert!(output.contains("draft <roast|party|potluck>"));
        assert_eq!(output.matches("No active event").count(), 1);
    }

    #[test]
    fn test_potluck_board_from_two_shells() {
        let db = Database::open_in_memory().unwrap();
        let (mut host, _) = shell(&db, "Ana");
        let output = run(
            &mut host,
            "draft potluck\ntitle Street Potluck\ndate 2026-10-25 18:00\ncommit\ndish add Main Lasagna\n",
        );
        let event_id = created_id(&output);
        let dish_id = db.load_projection(event_id).unwrap().unwrap().dishes[0].id;

        let (mut guest, _) = shell(&db, "Ben");
        let output = run(
            &mut guest,
            &format!("load {event_id}\nclaim {dish_id}\nshow\nshare\n"),
        );
        assert!(output.contains("Lasagna - claimed by Ben"));
        assert!(output.contains(&format!("https://gather.app/potluck/{event_id}")));
    }

    #[test]
    fn test_mine_lists_hosted_events() {
        let db = Database::open_in_memory().unwrap();
        let (mut shell, _) = shell(&db, "Ana");

        let output = run(
            &mut shell,
            "mine\ndraft party\ntitle Birthday\ndate 2026-11-01 19:00\ncommit\nmine\n",
        );
        assert!(output.contains("Hosting: none"));
        assert!(output.contains("Birthday (Party Mode, planning)"));
    }

    #[test]
    fn test_picks_override_the_tally() {
        let db = Database::open_in_memory().unwrap();
        let (mut shell, _) = shell(&db, "Ana");

        let output = run(
            &mut shell,
            "draft roast\ntitle Family Dinner\ndate 2026-10-25 13:00\ncommit\n\
             vote protein Chicken\nvote protein Chicken\nvote side Greens\n\
             picks {\"protein\": \"Beef\"}\n",
        );

        assert!(output.contains("protein: Beef"));
        assert!(output.contains("side: Greens"));
        let stored = db.find_event_by_id(created_id(&output)).unwrap().unwrap();
        assert_eq!(stored.status, EventStatus::Locked);
        assert_eq!(stored.menu_selected.unwrap()["votes"]["protein"]["winner"], "Beef");
    }
}
