// End-to-end dashboard session through the public API

use chrono::NaiveDate;
use claim_appeals::{
    load_claims_csv, sample_denials, AppConfig, AppealConfig, ChecklistOutcome, Dashboard,
    DashboardEvent, DocumentCategory, FileDescriptor, ManualClock, SequencerEvent,
    VerificationConfig, VerificationPhase, VerificationSequencer,
};
use rand::rngs::mock::StepRng;
use std::sync::Arc;
use std::time::Duration;

fn dashboard(rng: StepRng) -> (Dashboard, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(
        NaiveDate::from_ymd_opt(2025, 5, 12).unwrap(),
        1_746_000_000_000,
    ));
    let sequencer = VerificationSequencer::with_rng(
        VerificationConfig::default(),
        AppealConfig::default(),
        Box::new(rng),
    );
    (Dashboard::new(sequencer, clock.clone()), clock)
}

#[test]
fn full_appeal_session() {
    let (mut dash, clock) = dashboard(StepRng::new(0, 0));

    dash.dispatch(DashboardEvent::GenerateSamples).unwrap();
    dash.dispatch(DashboardEvent::DocumentUpload(vec![
        FileDescriptor::new("Premier_GPO_roster.pdf", 5_120),
        FileDescriptor::new("invoice_5521.docx", 900),
        FileDescriptor::new("scan.png", 10),
    ]))
    .unwrap();
    assert_eq!(dash.documents().files(DocumentCategory::Gpo).len(), 1);
    assert_eq!(dash.documents().files(DocumentCategory::Invoices).len(), 1);
    assert_eq!(dash.documents().total(), 2);

    dash.dispatch(DashboardEvent::ClaimClicked("CLM005".to_string()))
        .unwrap();

    let mut progress = Vec::new();
    for _ in 0..5 {
        clock.advance(Duration::from_millis(800));
        for event in dash.tick() {
            if let SequencerEvent::Progressed(p) = event {
                progress.push(p);
            }
        }
    }
    assert_eq!(progress, vec![20, 40, 60, 80, 100]);

    let draft = match dash.verification().phase() {
        VerificationPhase::Complete {
            outcome: ChecklistOutcome::Invalid { email_draft, .. },
        } => email_draft.clone(),
        other => panic!("expected an invalid outcome, got {other:?}"),
    };
    assert!(draft.contains("CLM005"));
    assert!(draft.contains("16714-063-01"));
    assert!(draft.contains("Morris & Dickson"));
    assert!(draft.contains("dated 5/12/2025"));

    dash.dispatch(DashboardEvent::SendAppeal).unwrap();
    clock.advance(Duration::from_millis(2000));
    dash.tick();

    assert!(!dash.is_modal_open());
    let titles: Vec<&str> = dash.notifications().map(|n| n.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Sample Data Generated",
            "Document Uploaded",
            "Document Uploaded",
            "Email Sent Successfully! 📧"
        ]
    );
}

#[test]
fn reopening_another_claim_restarts_progress() {
    let (mut dash, clock) = dashboard(StepRng::new(u64::MAX, 0));
    dash.generate_sample_denials();

    dash.claim_clicked("CLM001").unwrap();
    clock.advance(Duration::from_millis(2400));
    dash.tick();
    assert_eq!(dash.verification().progress(), 60);

    dash.close_modal();
    dash.claim_clicked("CLM003").unwrap();
    assert_eq!(dash.verification().progress(), 0);

    clock.advance(Duration::from_millis(4000));
    let completions = dash
        .tick()
        .into_iter()
        .filter(|e| matches!(e, SequencerEvent::Completed { .. }))
        .count();
    assert_eq!(completions, 1);
    assert!(dash.verification().outcome().unwrap().is_valid());
    assert_eq!(dash.verification().claim().unwrap().id, "CLM003");
}

#[test]
fn claims_csv_round_trips_samples() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("denials.csv");

    let mut writer = csv::Writer::from_path(&path).unwrap();
    for claim in sample_denials() {
        writer.serialize(&claim).unwrap();
    }
    writer.flush().unwrap();

    assert_eq!(load_claims_csv(&path).unwrap(), sample_denials());

    let mut config = AppConfig::default();
    config.data.claims_csv = Some(path);
    let clock = Arc::new(ManualClock::new(
        NaiveDate::from_ymd_opt(2025, 5, 12).unwrap(),
        0,
    ));
    let dash = Dashboard::from_config(&config, clock).unwrap();
    assert_eq!(dash.claims().len(), 5);
    assert_eq!(dash.claims()[4].amount, "$674.15");
}
