use chrono::TimeDelta;
use domains::{time, Reply, ReplyId, Thread, ThreadId, DELETED_REPLY_TEXT, REPLY_PREVIEW};
use serde_json::json;

#[test]
fn test_thread_ids_round_trip_through_text() {
    let id = ThreadId::new();
    let parsed: ThreadId = id.to_string().parse().unwrap();
    assert_eq!(parsed, id);
    assert!(" not-a-uuid ".parse::<ThreadId>().is_err());
}

#[test]
fn test_ids_serialize_as_plain_strings() {
    let id = ReplyId::new();
    assert_eq!(serde_json::to_value(id).unwrap(), json!(id.to_string()));
}

#[test]
fn test_view_hides_board_password_and_flag() {
    let mut thread = Thread::new("board1", "hello", "pw1");
    thread.reported = true;
    let at = time::strictly_after(thread.bumped_on);
    thread.append(Reply::new("hi", "pw2", at));

    let json = serde_json::to_value(thread.detail()).unwrap();
    let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys.len(), 5);
    for key in ["_id", "text", "created_on", "bumped_on", "replies"] {
        assert!(keys.contains(&key), "missing {key}");
    }

    let reply = &json["replies"][0];
    assert_eq!(reply.as_object().unwrap().len(), 3);
    assert_eq!(reply["text"], "hi");
    assert!(!json.to_string().contains("pw1"));
    assert!(!json.to_string().contains("pw2"));
}

#[test]
fn test_preview_keeps_latest_replies_in_order() {
    let mut thread = Thread::new("b", "op", "pw");
    for i in 0..5 {
        let at = thread.bumped_on + TimeDelta::milliseconds(1);
        thread.append(Reply::new(format!("r{i}"), "pw", at));
    }

    assert_eq!(thread.detail().replies.len(), 5);

    thread.truncate_replies(REPLY_PREVIEW);
    let texts: Vec<String> = thread.detail().replies.into_iter().map(|r| r.text).collect();
    assert_eq!(texts, ["r2", "r3", "r4"]);
}

#[test]
fn test_late_reply_never_rewinds_bump() {
    let mut thread = Thread::new("b", "op", "pw");
    let later = thread.bumped_on + TimeDelta::seconds(10);
    thread.append(Reply::new("late", "pw", later));
    thread.append(Reply::new("stale", "pw", later - TimeDelta::seconds(5)));

    assert_eq!(thread.bumped_on, later);
    assert_eq!(thread.replies.len(), 2);
}

#[test]
fn test_deleted_reply_is_recognised() {
    let mut reply = Reply::new("text", "pw", time::now());
    assert!(!reply.is_deleted());
    reply.text = DELETED_REPLY_TEXT.to_string();
    assert!(reply.is_deleted());
}

#[test]
fn test_timestamps_are_millisecond_precision() {
    let now = time::now();
    assert_eq!(now.timestamp_subsec_nanos() % 1_000_000, 0);
    assert!(time::strictly_after(now) > now);
}
