use super::*;

#[test]
fn tone_round_trips_through_serde() {
    for tone in Tone::ALL {
        let json = serde_json::to_string(&tone).unwrap();
        let back: Tone = serde_json::from_str(&json).unwrap();
        assert_eq!(tone, back);
    }
}

#[test]
fn tone_serializes_lowercase() {
    assert_eq!(
        serde_json::to_string(&Tone::Professional).unwrap(),
        "\"professional\""
    );
}

#[test]
fn tone_parses_case_insensitive() {
    assert_eq!("Friendly".parse::<Tone>().unwrap(), Tone::Friendly);
    assert_eq!(" concise ".parse::<Tone>().unwrap(), Tone::Concise);
    assert!("casual".parse::<Tone>().is_err());
}

#[test]
fn reply_action_parses() {
    assert_eq!("insert".parse::<ReplyAction>().unwrap(), ReplyAction::Insert);
    assert_eq!("COPY".parse::<ReplyAction>().unwrap(), ReplyAction::Copy);
    assert!("paste".parse::<ReplyAction>().is_err());
}

#[test]
fn usage_snapshot_remaining_saturates() {
    let snapshot = UsageSnapshot {
        count: 7,
        limit: 5,
        window_end: chrono::Utc::now(),
    };
    assert_eq!(snapshot.remaining(), 0);

    let snapshot = UsageSnapshot {
        count: 2,
        limit: 5,
        window_end: chrono::Utc::now(),
    };
    assert_eq!(snapshot.remaining(), 3);
}
