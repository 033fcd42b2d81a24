use super::*;

#[test]
fn printer_emits_only_unseen_turns() {
    let mut printer = TranscriptPrinter::default();
    let mut turns = vec![ChatTurn::user("What is the refund policy?")];

    assert_eq!(
        printer.new_lines(&turns),
        vec!["You: What is the refund policy?"]
    );

    turns.push(ChatTurn::assistant("Refunds are available within 30 days."));
    assert_eq!(
        printer.new_lines(&turns),
        vec!["Assistant: Refunds are available within 30 days."]
    );
    assert!(printer.new_lines(&turns).is_empty());
}

#[test]
fn notifications_are_tagged_by_level() {
    assert_eq!(
        format_notification(&Notification::success("Uploaded 14 chunks from 2 file(s)!")),
        "[ok] Uploaded 14 chunks from 2 file(s)!"
    );
    assert_eq!(
        format_notification(&Notification::error("Upload failed: rate limited")),
        "[error] Upload failed: rate limited"
    );
}

#[test]
fn uploaded_file_listing() {
    assert_eq!(format_uploaded_files(&[]), "No files uploaded yet.");
    assert_eq!(
        format_uploaded_files(&[
            UploadedFileRecord::new("a.pdf"),
            UploadedFileRecord::new("b.md"),
        ]),
        "Uploaded files:\n  - a.pdf\n  - b.md"
    );
}
