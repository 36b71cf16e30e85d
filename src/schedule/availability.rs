use std::collections::BTreeMap;

use super::types::{Attendee, Court, TimeSlot};

/// Maps every slot to the labels of the courts open at that slot, in court order.
/// Slots with no open court get no entry.
pub fn court_availability(courts: &[Court], slots: &[TimeSlot]) -> BTreeMap<TimeSlot, Vec<String>> {
    let mut index = BTreeMap::new();
    for &slot in slots {
        let open: Vec<String> = courts
            .iter()
            .filter(|c| c.is_open_at(slot))
            .map(|c| c.label.clone())
            .collect();
        if !open.is_empty() {
            index.insert(slot, open);
        }
    }
    index
}

/// Names of the attendees present at a slot, in roster order.
/// Attendees without a usable window are skipped.
pub fn eligible_at(roster: &[Attendee], slot: TimeSlot) -> Vec<&str> {
    roster
        .iter()
        .filter(|a| a.is_present_at(slot))
        .map(|a| a.name.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::slot_utils::{parse_time, time_slots};
    use crate::schedule::types::Gender;

    fn t(s: &str) -> chrono::NaiveTime {
        parse_time(s).unwrap()
    }

    #[test]
    fn courts_open_by_their_own_window() {
        let courts = vec![
            Court::new("1", t("19:00"), t("21:00")),
            Court::new("2", t("19:30"), t("20:30")),
            Court::new("3", t("22:00"), t("23:00")),
        ];
        let slots = time_slots(t("19:00"), t("21:00"), 30).unwrap();
        let index = court_availability(&courts, &slots);

        assert_eq!(index[&slots[0]], ["1"]);
        assert_eq!(index[&slots[1]], ["1", "2"]);
        assert_eq!(index[&slots[2]], ["1", "2"]);
        // court 2 closes at 20:30 (exclusive)
        assert_eq!(index[&slots[3]], ["1"]);
        assert!(index.values().all(|labels| !labels.contains(&"3".to_string())));
    }

    #[test]
    fn slot_without_courts_has_no_entry() {
        let courts = vec![Court::new("1", t("20:00"), t("21:00"))];
        let slots = time_slots(t("19:00"), t("21:00"), 30).unwrap();
        let index = court_availability(&courts, &slots);
        assert_eq!(index.len(), 2);
        assert!(!index.contains_key(&slots[0]));
    }

    #[test]
    fn eligibility_uses_half_open_window() {
        let roster = vec![
            Attendee::new("Ann", Gender::F, t("19:00"), t("20:00")),
            Attendee::new("Bob", Gender::M, t("19:30"), t("21:00")),
        ];
        let slots = time_slots(t("19:00"), t("21:00"), 30).unwrap();
        assert_eq!(eligible_at(&roster, slots[0]), ["Ann"]);
        assert_eq!(eligible_at(&roster, slots[1]), ["Ann", "Bob"]);
        assert_eq!(eligible_at(&roster, slots[2]), ["Bob"]);
    }

    #[test]
    fn malformed_windows_are_skipped() {
        let roster = vec![
            Attendee { name: "NoTimes".into(), gender: Gender::M, available_from: None, available_until: None },
            Attendee { name: "NoEnd".into(), gender: Gender::F, available_from: Some(t("19:00")), available_until: None },
            Attendee::new("Inverted", Gender::M, t("21:00"), t("19:00")),
            Attendee::new("Fine", Gender::F, t("19:00"), t("21:00")),
        ];
        let slot = TimeSlot::new(t("19:30"));
        assert_eq!(eligible_at(&roster, slot), ["Fine"]);
    }
}
