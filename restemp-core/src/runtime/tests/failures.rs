//! A failing phase stops the run and its error is returned unchanged.

use crate::config::RunConfig;
use crate::errors::RunError;
use crate::example_models::{
    daily_dates, Call, TestInitializer, TestModelParameters, TestPlotter,
};
use crate::runtime::HistoricalRun;
use chrono::NaiveDate;

fn dates(n: usize) -> Vec<NaiveDate> {
    daily_dates(NaiveDate::from_ymd_opt(2015, 6, 1).unwrap(), n)
}

fn execute(initializer: &TestInitializer, plotter: &mut TestPlotter) -> (RunError, String) {
    let mut progress = Vec::new();
    let err = HistoricalRun::new(RunConfig::new("shasta.yaml"))
        .execute_with_progress(initializer, plotter, &mut progress)
        .unwrap_err();
    (err, String::from_utf8(progress).unwrap())
}

fn count(calls: &[Call], call: &Call) -> usize {
    calls.iter().filter(|c| *c == call).count()
}

#[test]
fn initialization_failure() {
    let initializer = TestInitializer::new(TestModelParameters {
        dates: dates(3),
        fail_initialize: true,
        ..Default::default()
    });
    let mut plotter = TestPlotter::new(initializer.log.clone());

    let (err, progress) = execute(&initializer, &mut plotter);

    assert_eq!(
        err,
        RunError::Initialization("cannot read shasta.yaml".to_string())
    );
    assert_eq!(initializer.calls().len(), 1);
    assert!(progress.is_empty());
}

#[test]
fn restemp_failure_stops_the_loop() {
    let initializer = TestInitializer::new(TestModelParameters {
        dates: dates(5),
        fail_restemp_on: Some(3),
        ..Default::default()
    });
    let mut plotter = TestPlotter::new(initializer.log.clone());

    let (err, progress) = execute(&initializer, &mut plotter);

    assert_eq!(err, RunError::Step("restemp diverged on step 3".to_string()));
    let calls = initializer.calls();
    assert_eq!(count(&calls, &Call::AdvanceRestemp), 3);
    assert_eq!(count(&calls, &Call::AdvanceSwd(true)), 2);
    assert_eq!(calls.last(), Some(&Call::AdvanceRestemp));
    assert!(!calls.contains(&Call::Finalize));

    // The failing date is reported before it is stepped, no timing line follows.
    assert_eq!(
        progress.lines().collect::<Vec<_>>(),
        vec!["2015-06-01", "2015-06-02", "2015-06-03"]
    );
}

#[test]
fn swd_failure_on_first_date() {
    let initializer = TestInitializer::new(TestModelParameters {
        dates: dates(4),
        fail_swd_on: Some(1),
        ..Default::default()
    });
    let mut plotter = TestPlotter::new(initializer.log.clone());

    let (err, _) = execute(&initializer, &mut plotter);

    assert_eq!(
        err,
        RunError::Step("no withdrawal solution on step 1".to_string())
    );
    let calls = initializer.calls();
    assert_eq!(count(&calls, &Call::AdvanceRestemp), 1);
    assert_eq!(count(&calls, &Call::AdvanceSwd(true)), 1);
    assert!(!calls.contains(&Call::Finalize));
}

#[test]
fn failure_on_last_date() {
    let initializer = TestInitializer::new(TestModelParameters {
        dates: dates(4),
        fail_swd_on: Some(4),
        ..Default::default()
    });
    let mut plotter = TestPlotter::new(initializer.log.clone());

    let (err, _) = execute(&initializer, &mut plotter);

    assert!(matches!(err, RunError::Step(_)));
    let calls = initializer.calls();
    assert_eq!(count(&calls, &Call::AdvanceRestemp), 4);
    assert!(!calls.contains(&Call::Finalize));
}

#[test]
fn finalize_failure() {
    let initializer = TestInitializer::new(TestModelParameters {
        dates: dates(2),
        fail_finalize: true,
        ..Default::default()
    });
    let mut plotter = TestPlotter::new(initializer.log.clone());

    let (err, _) = execute(&initializer, &mut plotter);

    assert_eq!(
        err,
        RunError::Finalize("results could not be assembled".to_string())
    );
    let calls = initializer.calls();
    assert_eq!(count(&calls, &Call::Finalize), 1);
    assert!(!calls.iter().any(|c| matches!(c, Call::Result(_))));
}

#[test]
fn missing_result() {
    let initializer = TestInitializer::new(TestModelParameters {
        dates: dates(2),
        result_names: Some(vec!["ReleaseDF".to_string()]),
        ..Default::default()
    });
    let mut plotter = TestPlotter::new(initializer.log.clone());

    let (err, _) = execute(&initializer, &mut plotter);

    assert_eq!(
        err,
        RunError::MissingResult {
            key: "ProfilesDF".to_string(),
            available: vec!["ReleaseDF".to_string()],
        }
    );
    assert!(!initializer
        .calls()
        .iter()
        .any(|c| matches!(c, Call::PlotReleases(_))));
}

#[test]
fn plot_failure() {
    let initializer = TestInitializer::new(TestModelParameters {
        dates: dates(2),
        ..Default::default()
    });
    let mut plotter = TestPlotter::new(initializer.log.clone());
    plotter.fail_releases = true;

    let (err, _) = execute(&initializer, &mut plotter);

    assert!(matches!(err, RunError::Plot { ref plot, .. } if plot == "releases"));
    assert!(!initializer
        .calls()
        .iter()
        .any(|c| matches!(c, Call::PlotProfiles(..))));
}
