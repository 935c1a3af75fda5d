use parkcheck_core::models::transcript::{ChatEntry, SYSTEM_INSTRUCTION, Transcript};

#[test]
fn new_transcript_holds_only_system_instruction() {
    let t = Transcript::default();
    assert!(t.is_empty());
    assert_eq!(t.len(), 1);
    assert_eq!(t.system(), SYSTEM_INSTRUCTION);
    assert!(t.visible().is_empty());
}

#[test]
fn system_instruction_wording_is_fixed() {
    assert_eq!(
        SYSTEM_INSTRUCTION,
        "You are a helpful medical assistant. Only answer questions related to Parkinson\u{2019}s disease."
    );
}

#[test]
fn turns_append_after_system_entry() {
    let mut t = Transcript::default();
    t.push_user("What is PPE?");
    t.push_assistant("Pitch period entropy.");

    assert_eq!(t.len(), 3);
    assert_eq!(t.entries()[0].role(), "system");
    assert_eq!(
        t.visible(),
        &[
            ChatEntry::User("What is PPE?".to_string()),
            ChatEntry::Assistant("Pitch period entropy.".to_string()),
        ]
    );
}

#[test]
fn reset_keeps_system_instruction() {
    let mut t = Transcript::new("custom instruction");
    t.push_user("one");
    t.push_assistant("two");
    t.push_user("three");

    t.reset();
    assert!(t.is_empty());
    assert_eq!(t.entries(), &[ChatEntry::System("custom instruction".to_string())]);
}

#[test]
fn entries_serialize_with_role_tag() {
    let entry = ChatEntry::User("hello".to_string());
    let json = serde_json::to_value(&entry).unwrap();
    assert_eq!(json, serde_json::json!({ "role": "user", "content": "hello" }));
}
