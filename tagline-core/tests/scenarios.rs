use pretty_assertions::assert_eq;

use tagline_core::{
    build_export_record, to_json, AnnotateError, Command, ExportAnnotation, PageStore, Session,
    Tag, TextRange,
};

fn session(texts: &[&str]) -> Session {
    Session::new("dataset.csv", PageStore::from_texts(texts.iter().copied()))
}

fn tag(session: &mut Session, tag: Tag, start: usize, end: usize) {
    session.apply(Command::SetTag(tag)).unwrap();
    session
        .commit_selection(TextRange::new(start, end))
        .unwrap()
        .expect("span should be created");
}

#[test]
fn tag_company_and_export() {
    let mut session = session(&["Acme Corp called today"]);
    tag(&mut session, Tag::Firma, 0, 9);

    let record = build_export_record(&session.dataset_name, &session.store);
    assert_eq!(
        record.pages[0].annotations,
        vec![ExportAnnotation {
            tag: "FIRMA".to_string(),
            start: 0,
            end: 9,
            text: "Acme Corp".to_string(),
        }]
    );
}

#[test]
fn repeated_word_exports_tagged_occurrence() {
    let mut session = session(&["Acme said Acme is great"]);
    tag(&mut session, Tag::Firma, 10, 14);

    let record = build_export_record("d", &session.store);
    let annotation = &record.pages[0].annotations[0];
    assert_eq!(annotation.text, "Acme");
    assert_eq!((annotation.start, annotation.end), (10, 14));
}

#[test]
fn duplicate_texts_resolve_independently() {
    let mut session = session(&["Acme said Acme is great"]);
    tag(&mut session, Tag::Firma, 10, 14);
    tag(&mut session, Tag::Firma, 0, 4);

    let record = build_export_record("d", &session.store);
    let offsets: Vec<_> = record.pages[0]
        .annotations
        .iter()
        .map(|a| (a.start, a.end))
        .collect();
    assert_eq!(offsets, vec![(0, 4), (10, 14)]);
}

#[test]
fn offsets_count_characters_not_bytes() {
    let mut session = session(&["Güzel bir gün, Türk Telekom harika"]);
    tag(&mut session, Tag::Firma, 15, 27);

    let record = build_export_record("d", &session.store);
    let annotation = &record.pages[0].annotations[0];
    assert_eq!(annotation.text, "Türk Telekom");
    assert_eq!((annotation.start, annotation.end), (15, 27));
}

#[test]
fn delete_middle_page_while_on_last() {
    let mut session = session(&["one", "two", "three"]);
    tag(&mut session, Tag::Notr, 0, 3);
    session.apply(Command::GotoPage(3)).unwrap();
    tag(&mut session, Tag::Pozitif, 0, 5);

    session.store.delete(Some(2)).unwrap();

    assert_eq!(session.store.total_pages(), 2);
    assert_eq!(session.store.active_index(), 2);
    let moved = session.store.page(2).unwrap();
    assert_eq!(moved.text(), "three");
    assert!(moved.spans().iter().all(|s| s.page_index == 2));
    assert_eq!(moved.spans()[0].tag, Tag::Pozitif);

    let untouched = session.store.page(1).unwrap();
    assert_eq!(untouched.spans()[0].page_index, 1);
}

#[test]
fn delete_renumbers_every_later_page() {
    let texts: Vec<String> = (1..=6).map(|i| format!("page number {}", i)).collect();
    let mut session = Session::new("d", PageStore::from_texts(&texts));
    for n in 1..=6 {
        session.apply(Command::GotoPage(n)).unwrap();
        tag(&mut session, Tag::Notr, 0, 4);
    }

    session.store.delete(Some(3)).unwrap();

    let indices: Vec<_> = session.store.pages().iter().map(|p| p.index).collect();
    assert_eq!(indices, vec![1, 2, 3, 4, 5]);
    for page in session.store.pages() {
        assert!(page.spans().iter().all(|s| s.page_index == page.index));
    }
    let texts: Vec<_> = session.store.pages().iter().map(|p| p.text()).collect();
    assert_eq!(
        texts,
        vec!["page number 1", "page number 2", "page number 4", "page number 5", "page number 6"]
    );
}

#[test]
fn out_of_range_jump_changes_nothing() {
    let mut session = session(&["a", "b"]);
    tag(&mut session, Tag::Negatif, 0, 1);
    let before = to_json(&(&session).into()).unwrap();

    for n in [0, 3, usize::MAX] {
        assert!(matches!(
            session.apply(Command::GotoPage(n)),
            Err(AnnotateError::PageOutOfRange { .. })
        ));
    }

    assert_eq!(session.store.active_index(), 1);
    assert_eq!(to_json(&(&session).into()).unwrap(), before);
}

#[test]
fn tagging_and_clearing_round_trips_text() {
    let mut session = session(&["The service at Acme was slow"]);
    tag(&mut session, Tag::Firma, 15, 19);
    tag(&mut session, Tag::Negatif, 24, 28);

    let page = session.store.active_page().unwrap();
    let joined: String = page.segments().iter().map(|s| s.text).collect();
    assert_eq!(joined, "The service at Acme was slow");

    session.apply(Command::ClearTag).unwrap();
    let page = session.store.active_page().unwrap();
    let segments = page.segments();
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].text, "The service at Acme was slow");
    assert_eq!(segments[0].tag, None);
}

#[test]
fn export_is_deterministic() {
    let mut session = session(&["Acme Corp called today", "Nothing here"]);
    tag(&mut session, Tag::Firma, 0, 9);
    tag(&mut session, Tag::Notr, 17, 22);

    let first = to_json(&build_export_record("d", &session.store)).unwrap();
    let second = to_json(&build_export_record("d", &session.store)).unwrap();
    assert_eq!(first, second);
}
