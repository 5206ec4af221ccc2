use crate::alert_log::interface::AlertLog;
use crate::library::notice::{Notice, NoticeLevel};
use crate::monitoring_page::core::{Event, View};
use crate::monitoring_page::tests::fixture::{settle, Fixture};

#[test]
fn test_first_open_creates_header_only_log() {
    let f = Fixture::new();
    let mut page = f.page();

    settle(&mut page);

    assert_eq!(page.state().view, View::RenderedEmpty { notices: vec![] });
    assert_eq!(
        std::fs::read_to_string(&f.config.alerts_file).unwrap(),
        "Time,Animal,Confidence,Image\n"
    );
}

#[test]
fn test_rows_show_with_thumbnails() {
    let f = Fixture::new();
    f.alert(1, "lion", 0.61);
    f.alert(2, "tiger", 0.87);
    let mut page = f.page();

    settle(&mut page);

    let View::RenderedWithRows { rows, notices, .. } = &page.state().view else {
        panic!("expected rows, got {:?}", page.state().view);
    };
    assert!(notices.is_empty());
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].animal, "tiger");
    assert_eq!(rows[1].confidence, "0.87");
    assert_eq!(rows[1].time, "2024-03-09 07:05:02");
    // 64x48 scaled to the configured thumbnail width
    assert_eq!(rows[0].thumbnail.width(), 32);
    assert_eq!(rows[0].thumbnail.height(), 24);
}

#[test]
fn test_missing_image_is_reported_per_row() {
    let f = Fixture::new();
    let gone = f.alert(1, "lion", 0.61);
    f.alert(2, "tiger", 0.87);
    std::fs::remove_file(&gone.image).unwrap();
    let mut page = f.page();

    settle(&mut page);

    let View::RenderedWithRows { rows, notices, .. } = &page.state().view else {
        panic!("expected rows, got {:?}", page.state().view);
    };
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].animal, "tiger");
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert!(notices[0].text.contains(&gone.image));
}

#[test]
fn test_refresh_picks_up_new_alerts() {
    let f = Fixture::new();
    let mut page = f.page();
    settle(&mut page);

    f.alert(3, "leopard", 0.99);
    page.dispatch(Event::RefreshClicked);
    settle(&mut page);

    let View::RenderedWithRows { rows, .. } = &page.state().view else {
        panic!("expected rows, got {:?}", page.state().view);
    };
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].animal, "leopard");
}

#[test]
fn test_refresh_without_changes_keeps_rows() {
    let f = Fixture::new();
    f.alert(1, "lion", 0.61);
    let mut page = f.page();
    settle(&mut page);
    let before = page.state().view.clone();

    page.dispatch(Event::RefreshClicked);
    settle(&mut page);

    assert_eq!(page.state().view, before);
}

#[test]
fn test_clear_empties_log_and_page() {
    let f = Fixture::new();
    f.alert(1, "lion", 0.61);
    f.alert(2, "tiger", 0.87);
    let mut page = f.page();
    settle(&mut page);

    page.dispatch(Event::ClearClicked);
    settle(&mut page);

    let View::RenderedEmpty { notices } = &page.state().view else {
        panic!("expected empty, got {:?}", page.state().view);
    };
    assert_eq!(notices[0].text, "All alerts have been deleted.");
    assert!(f.alert_log.load().unwrap().is_empty());
    assert_eq!(
        std::fs::read_to_string(&f.config.alerts_file).unwrap(),
        "Time,Animal,Confidence,Image\n"
    );
}

#[test]
fn test_unreadable_log_fails_page() {
    let f = Fixture::new();
    std::fs::write(&f.config.alerts_file, "When,What\n").unwrap();
    let mut page = f.page();

    settle(&mut page);

    let View::Failed { message } = &page.state().view else {
        panic!("expected failure, got {:?}", page.state().view);
    };
    assert!(message.contains("header"));
}

#[test]
fn test_clear_before_first_load_finishes_stays_cleared() {
    let f = Fixture::new();
    f.alert(1, "lion", 0.61);
    let mut page = f.page();

    page.dispatch(Event::ClearClicked);
    settle(&mut page);

    assert_eq!(
        page.state().view,
        View::RenderedEmpty {
            notices: vec![Notice::success("All alerts have been deleted.")],
        }
    );
    assert!(f.alert_log.load().unwrap().is_empty());
}
