use crate::config::{ProfilePlotOptions, ReleasePlotOptions};
use crate::errors::{RunError, RunResult};
use crate::model::{ModelInitializer, Plotter, ReservoirModel};
use crate::results::SimulationResults;
use crate::table::ResultTable;
use crate::units::TemperatureUnits;
use chrono::{Days, NaiveDate};
use numpy::ndarray::Array2;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

/// A call made on one of the test doubles.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Initialize(PathBuf, TemperatureUnits),
    SimDates,
    AdvanceRestemp,
    AdvanceSwd(bool),
    Finalize,
    Result(String),
    PlotReleases(ReleasePlotOptions),
    PlotProfiles(usize, ProfilePlotOptions),
}

pub type CallLog = Rc<RefCell<Vec<Call>>>;

pub fn daily_dates(start: NaiveDate, n: usize) -> Vec<NaiveDate> {
    (0..n as u64)
        .map(|i| start.checked_add_days(Days::new(i)).unwrap())
        .collect()
}

/// Builds a table with one row per date and a single column.
pub fn table_for(dates: &[NaiveDate], column: &str, value: f64) -> ResultTable {
    ResultTable::new(
        dates.to_vec(),
        vec![column.to_string()],
        Array2::from_elem((dates.len(), 1), value),
    )
    .unwrap()
}

#[derive(Debug, Clone, Default)]
pub struct TestModelParameters {
    pub dates: Vec<NaiveDate>,
    /// Fail `advance_restemp` on this (1-based) call.
    pub fail_restemp_on: Option<usize>,
    /// Fail `advance_swd` on this (1-based) call.
    pub fail_swd_on: Option<usize>,
    pub fail_finalize: bool,
    pub fail_initialize: bool,
    pub initialize_delay: Duration,
    pub step_delay: Duration,
    pub finalize_delay: Duration,
    /// Result names produced by finalize. Defaults to the releases and profiles keys.
    pub result_names: Option<Vec<String>>,
}

/// A model that records every call made on it.
#[derive(Debug)]
pub struct TestModel {
    parameters: TestModelParameters,
    log: CallLog,
    restemp_calls: usize,
    swd_calls: usize,
    results: Option<SimulationResults>,
}

impl TestModel {
    pub fn new(parameters: TestModelParameters, log: CallLog) -> Self {
        Self {
            parameters,
            log,
            restemp_calls: 0,
            swd_calls: 0,
            results: None,
        }
    }

    fn record(&self, call: Call) {
        self.log.borrow_mut().push(call);
    }
}

impl ReservoirModel for TestModel {
    type Table = ResultTable;

    fn sim_dates(&self) -> RunResult<Vec<NaiveDate>> {
        self.record(Call::SimDates);
        Ok(self.parameters.dates.clone())
    }

    fn advance_restemp(&mut self) -> RunResult<()> {
        self.restemp_calls += 1;
        self.record(Call::AdvanceRestemp);
        std::thread::sleep(self.parameters.step_delay);
        if self.parameters.fail_restemp_on == Some(self.restemp_calls) {
            return Err(RunError::Step(format!(
                "restemp diverged on step {}",
                self.restemp_calls
            )));
        }
        Ok(())
    }

    fn advance_swd(&mut self, final_pass: bool) -> RunResult<()> {
        self.swd_calls += 1;
        self.record(Call::AdvanceSwd(final_pass));
        if self.parameters.fail_swd_on == Some(self.swd_calls) {
            return Err(RunError::Step(format!(
                "no withdrawal solution on step {}",
                self.swd_calls
            )));
        }
        Ok(())
    }

    fn finalize(&mut self) -> RunResult<()> {
        self.record(Call::Finalize);
        std::thread::sleep(self.parameters.finalize_delay);
        if self.parameters.fail_finalize {
            return Err(RunError::Finalize("results could not be assembled".to_string()));
        }

        let names = self.parameters.result_names.clone().unwrap_or_else(|| {
            vec![
                crate::config::RELEASES_KEY.to_string(),
                crate::config::PROFILES_KEY.to_string(),
            ]
        });
        let mut results = SimulationResults::new();
        for (i, name) in names.into_iter().enumerate() {
            results.add(name, table_for(&self.parameters.dates, "temperature", 50.0 + i as f64))?;
        }
        self.results = Some(results);
        Ok(())
    }

    fn result(&self, key: &str) -> RunResult<ResultTable> {
        self.record(Call::Result(key.to_string()));
        match &self.results {
            Some(results) => results.get(key).cloned(),
            None => Err(RunError::Error("model has not been finalized".to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TestInitializer {
    pub parameters: TestModelParameters,
    pub log: CallLog,
}

impl TestInitializer {
    pub fn new(parameters: TestModelParameters) -> Self {
        Self {
            parameters,
            log: CallLog::default(),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.log.borrow().clone()
    }
}

impl ModelInitializer for TestInitializer {
    type Model = TestModel;

    fn initialize(&self, config_path: &Path, units: TemperatureUnits) -> RunResult<TestModel> {
        self.log
            .borrow_mut()
            .push(Call::Initialize(config_path.to_path_buf(), units));
        std::thread::sleep(self.parameters.initialize_delay);
        if self.parameters.fail_initialize {
            return Err(RunError::Initialization(format!(
                "cannot read {}",
                config_path.display()
            )));
        }
        Ok(TestModel::new(self.parameters.clone(), self.log.clone()))
    }
}

/// A plotter that records what it was asked to draw.
#[derive(Debug)]
pub struct TestPlotter {
    pub log: CallLog,
    pub fail_releases: bool,
    pub delay: Duration,
}

impl TestPlotter {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            fail_releases: false,
            delay: Duration::ZERO,
        }
    }
}

impl Plotter<TestModel> for TestPlotter {
    fn plot_releases(&mut self, _model: &TestModel, options: &ReleasePlotOptions) -> RunResult<()> {
        self.log
            .borrow_mut()
            .push(Call::PlotReleases(options.clone()));
        std::thread::sleep(self.delay);
        if self.fail_releases {
            return Err(RunError::Plot {
                plot: "releases".to_string(),
                message: "no display available".to_string(),
            });
        }
        Ok(())
    }

    fn plot_profiles(
        &mut self,
        _model: &TestModel,
        profiles: &ResultTable,
        options: &ProfilePlotOptions,
    ) -> RunResult<()> {
        self.log
            .borrow_mut()
            .push(Call::PlotProfiles(profiles.n_rows(), options.clone()));
        Ok(())
    }
}
