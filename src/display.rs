use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::schedule::{Attendee, Gender, ScheduleState};
use crate::stats::{PairStats, PlayerStats};

/// Formats a player name with a gender tag when the player is on the roster
pub fn format_player_name(name: &str, genders: &HashMap<&str, Gender>) -> String {
    match genders.get(name) {
        Some(Gender::M) => format!("{} (M)", name),
        Some(Gender::F) => format!("{} (F)", name),
        None => name.to_string(),
    }
}

fn format_team(players: &[Option<String>], genders: &HashMap<&str, Gender>) -> String {
    players
        .iter()
        .map(|p| match p {
            Some(name) => format_player_name(name, genders),
            None => "[EMPTY]".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" & ")
}

/// Writes the schedule slot by slot, then games and idle turns per player
pub fn write_schedule<W: Write>(out: &mut W, state: &ScheduleState, roster: &[Attendee]) -> io::Result<()> {
    let genders: HashMap<&str, Gender> = roster.iter().map(|a| (a.name.as_str(), a.gender)).collect();

    writeln!(out, "** Schedule **")?;
    if state.manually_edited {
        writeln!(out, "(manually edited)")?;
    }

    for &slot in &state.slots {
        writeln!(out)?;
        writeln!(out, "{}", slot)?;
        let mut any = false;
        for m in state.matches_at(slot) {
            any = true;
            writeln!(
                out,
                "  Court {}: {}  vs  {}  [{}-{}]",
                m.court,
                format_team(&m.players[..2], &genders),
                format_team(&m.players[2..], &genders),
                m.score[0],
                m.score[1]
            )?;
        }
        if !any {
            writeln!(out, "  [NO MATCHES]")?;
        }
        let idle = state.idle_at(slot);
        if !idle.is_empty() {
            let names: Vec<String> = idle.iter().map(|n| format_player_name(n, &genders)).collect();
            writeln!(out, "  Idle: {}", names.join(", "))?;
        }
    }

    writeln!(out)?;
    writeln!(out, "{:<24} {:>5} {:>5}", "Player", "Games", "Idle")?;
    for summary in state.player_summaries() {
        writeln!(out, "{:<24} {:>5} {:>5}", summary.name, summary.games, summary.idle)?;
    }

    Ok(())
}

/// Writes a schedule to a file
pub fn write_schedule_to_file<P: AsRef<Path>>(path: P, state: &ScheduleState, roster: &[Attendee]) -> io::Result<()> {
    let mut file = File::create(path)?;
    write_schedule(&mut file, state, roster)
}

/// Prints a schedule to stdout
pub fn print_schedule(state: &ScheduleState, roster: &[Attendee]) -> io::Result<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    write_schedule(&mut lock, state, roster)
}

pub fn write_standings<W: Write>(out: &mut W, players: &[PlayerStats], pairs: &[PairStats]) -> io::Result<()> {
    writeln!(out, "** Standings **")?;
    writeln!(
        out,
        "{:>3} {:<24} {:>3} {:>3} {:>3} {:>3} {:>4} {:>6} {:>5}",
        "#", "Player", "GP", "W", "D", "L", "Pts", "Win%", "+/-"
    )?;
    for (rank, s) in players.iter().enumerate() {
        writeln!(
            out,
            "{:>3} {:<24} {:>3} {:>3} {:>3} {:>3} {:>4} {:>5.1}% {:>+5}",
            rank + 1,
            s.name,
            s.games_played,
            s.wins,
            s.draws,
            s.losses,
            s.points,
            s.win_rate * 100.0,
            s.margin
        )?;
    }

    if !pairs.is_empty() {
        writeln!(out)?;
        writeln!(out, "** Pairs **")?;
        for p in pairs {
            writeln!(
                out,
                "{:<32} {:>3} {:>3}-{}-{} {:>5.1}% {:>+5}",
                format!("{} & {}", p.players.0, p.players.1),
                p.games_played,
                p.wins,
                p.draws,
                p.losses,
                p.win_rate * 100.0,
                p.margin
            )?;
        }
    }

    Ok(())
}
