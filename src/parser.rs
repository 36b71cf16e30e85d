use csv::{Reader, StringRecord};
use log::warn;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use crate::error::InputError;
use crate::schedule::{parse_time, Attendee, Court, Gender};
use crate::stats::MatchResult;

/// Finds a column by (case-insensitive) header name, falling back to a fixed index
fn column(headers: &StringRecord, name: &str, fallback: usize) -> usize {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
        .unwrap_or(fallback)
}

fn field<'r>(record: &'r StringRecord, col: usize) -> &'r str {
    record.get(col).unwrap_or("").trim()
}

/// Parses a gender value from various string representations, defaulting to M
fn parse_gender(value: &str) -> Gender {
    match value.trim().to_lowercase().as_str() {
        "f" | "female" | "w" | "woman" => Gender::F,
        _ => Gender::M,
    }
}

/// Parses a score, returning 0 if empty or invalid
fn parse_score(value: &str) -> u32 {
    value.trim().parse().unwrap_or(0)
}

/// Loads a roster (`name,gender,from,until`) from a CSV file
pub fn load_roster<P: AsRef<Path>>(csv_path: P) -> Result<Vec<Attendee>, InputError> {
    read_roster(Reader::from_path(csv_path)?)
}

/// Reads a roster. Rows without a name are skipped; a repeated name replaces
/// the earlier row. Unparsable times are kept as missing so the attendee is
/// never scheduled.
pub fn read_roster<R: Read>(mut reader: Reader<R>) -> Result<Vec<Attendee>, InputError> {
    let headers = reader.headers()?.clone();
    let name_col = column(&headers, "name", 0);
    let gender_col = column(&headers, "gender", 1);
    let from_col = column(&headers, "from", 2);
    let until_col = column(&headers, "until", 3);

    let mut roster: Vec<Attendee> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for result in reader.records() {
        let record = result?;
        let name = field(&record, name_col).to_string();
        if name.is_empty() {
            continue;
        }

        let attendee = Attendee {
            name: name.clone(),
            gender: parse_gender(field(&record, gender_col)),
            available_from: parse_time(field(&record, from_col)),
            available_until: parse_time(field(&record, until_col)),
        };
        if attendee.window().is_none() {
            warn!("Attendee {} has no usable time window and will not be scheduled", name);
        }

        // Later sign-up wins
        match positions.get(&name) {
            Some(&position) => roster[position] = attendee,
            None => {
                positions.insert(name, roster.len());
                roster.push(attendee);
            }
        }
    }

    Ok(roster)
}

/// Loads courts (`label,from,until`) from a CSV file
pub fn load_courts<P: AsRef<Path>>(csv_path: P) -> Result<Vec<Court>, InputError> {
    read_courts(Reader::from_path(csv_path)?)
}

pub fn read_courts<R: Read>(mut reader: Reader<R>) -> Result<Vec<Court>, InputError> {
    let headers = reader.headers()?.clone();
    let label_col = column(&headers, "label", 0);
    let from_col = column(&headers, "from", 1);
    let until_col = column(&headers, "until", 2);

    let mut courts = Vec::new();
    for result in reader.records() {
        let record = result?;
        let label = field(&record, label_col);
        let from = parse_time(field(&record, from_col));
        let until = parse_time(field(&record, until_col));

        match (label.is_empty(), from, until) {
            (false, Some(from), Some(until)) => courts.push(Court::new(label, from, until)),
            _ => warn!("Skipping court row {:?}: needs a label and two valid times", record),
        }
    }

    Ok(courts)
}

/// Loads completed matches (`player1..player4,score_a,score_b`) from a CSV file
pub fn load_results<P: AsRef<Path>>(csv_path: P) -> Result<Vec<MatchResult>, InputError> {
    read_results(Reader::from_path(csv_path)?)
}

pub fn read_results<R: Read>(mut reader: Reader<R>) -> Result<Vec<MatchResult>, InputError> {
    let headers = reader.headers()?.clone();
    let player_cols = [
        column(&headers, "player1", 0),
        column(&headers, "player2", 1),
        column(&headers, "player3", 2),
        column(&headers, "player4", 3),
    ];
    let score_a_col = column(&headers, "score_a", 4);
    let score_b_col = column(&headers, "score_b", 5);

    let mut results = Vec::new();
    for result in reader.records() {
        let record = result?;
        let players = player_cols.map(|col| field(&record, col).to_string());
        if players.iter().all(String::is_empty) {
            continue;
        }
        results.push(MatchResult {
            players,
            score: [
                parse_score(field(&record, score_a_col)),
                parse_score(field(&record, score_b_col)),
            ],
        });
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(data: &str) -> Reader<&[u8]> {
        Reader::from_reader(data.as_bytes())
    }

    #[test]
    fn roster_rows_are_parsed_and_merged() {
        let data = "name,gender,from,until\n\
                    Ann,F,19:00,21:00\n\
                    Bob,male,19:30,20:30\n\
                    ,F,19:00,21:00\n\
                    Ann,F,19:30,21:00\n";
        let roster = read_roster(reader(data)).unwrap();

        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].name, "Ann");
        assert_eq!(roster[0].gender, Gender::F);
        assert_eq!(roster[0].available_from, parse_time("19:30"));
        assert_eq!(roster[1].gender, Gender::M);
    }

    #[test]
    fn bad_times_become_missing_windows() {
        let data = "name,gender,from,until\nCat,F,soon,21:00\nDan,M,,\n";
        let roster = read_roster(reader(data)).unwrap();
        assert_eq!(roster.len(), 2);
        assert!(roster.iter().all(|a| a.window().is_none()));
    }

    #[test]
    fn headers_may_be_reordered() {
        let data = "until,from,name,gender\n21:00,19:00,Eve,F\n";
        let roster = read_roster(reader(data)).unwrap();
        assert_eq!(roster[0].name, "Eve");
        assert_eq!(roster[0].window(), Some((parse_time("19:00").unwrap(), parse_time("21:00").unwrap())));
    }

    #[test]
    fn invalid_court_rows_are_skipped() {
        let data = "label,from,until\nCourt 1,19:00,21:00\nCourt 2,nope,21:00\n,19:00,20:00\n";
        let courts = read_courts(reader(data)).unwrap();
        assert_eq!(courts.len(), 1);
        assert_eq!(courts[0].label, "Court 1");
    }

    #[test]
    fn results_parse_with_partial_teams() {
        let data = "player1,player2,player3,player4,score_a,score_b\n\
                    A,B,C,D,6,2\n\
                    A,,C,D,3,x\n\
                    ,,,,1,1\n";
        let results = read_results(reader(data)).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].score, [6, 2]);
        assert_eq!(results[1].team(0), ["A"]);
        assert_eq!(results[1].score, [3, 0]);
    }
}
