//! Activity registry and the loop-facing host that owns the current activity.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use howl_core::{Activity, Pulse};

use crate::activities::{
    AdditiveActivity, BjActivity, Calibration1Activity, Calibration2Activity, ChaosActivity,
    FastSlowActivity, LickActivity, LuxuryHjActivity, MilkerActivity, OppositesActivity,
    PenetrationActivity, RandomShapesActivity, RelentlessActivity, SimplexActivity, VibroActivity,
};
use crate::constants::{
    ACTIVITY_CHANGES_PER_MINUTE_AT_FULL, DEFAULT_ACTIVITY_CHANGE_PROBABILITY, DEFAULT_HOST_SEED,
};

/// Builds a fresh, uninitialised activity from a seed.
pub type ActivityFactory = fn(u64) -> Box<dyn Activity>;

/// Registry entry for one activity.
///
/// Fields:
/// - `name`: stable identifier, used on the command line
/// - `display_name`: human-readable label
/// - `randomly_select`: whether automatic activity changes may pick it
/// - `factory`: constructor taking the activity's seed
#[derive(Clone, Copy)]
pub struct ActivityInfo {
    pub name: &'static str,
    pub display_name: &'static str,
    pub randomly_select: bool,
    pub factory: ActivityFactory,
}

impl std::fmt::Debug for ActivityInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivityInfo")
            .field("name", &self.name)
            .field("display_name", &self.display_name)
            .field("randomly_select", &self.randomly_select)
            .finish_non_exhaustive()
    }
}

impl PartialEq for ActivityInfo {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ActivityInfo {}

fn info(
    name: &'static str,
    display_name: &'static str,
    randomly_select: bool,
    factory: ActivityFactory,
) -> ActivityInfo {
    ActivityInfo {
        name,
        display_name,
        randomly_select,
        factory,
    }
}

/// Every activity the host can run, in menu order.
pub fn available_activities() -> Vec<ActivityInfo> {
    vec![
        info("lick", "Infinite licks", true, |seed| {
            Box::new(LickActivity::new(seed))
        }),
        info("penetration", "Penetration", true, |seed| {
            Box::new(PenetrationActivity::new(seed))
        }),
        info("vibro", "Sliding vibrator", true, |seed| {
            Box::new(VibroActivity::new(seed))
        }),
        info("milker", "Milkmaster 3000", true, |seed| {
            Box::new(MilkerActivity::new(seed))
        }),
        info("chaos", "Chaos", true, |seed| Box::new(ChaosActivity::new(seed))),
        info("luxury-hj", "Luxury HJ", true, |seed| {
            Box::new(LuxuryHjActivity::new(seed))
        }),
        info("opposites", "Opposites", true, |seed| {
            Box::new(OppositesActivity::new(seed))
        }),
        info("calibration-1", "Calibration 1", false, |seed| {
            Box::new(Calibration1Activity::new(seed))
        }),
        info("calibration-2", "Calibration 2", false, |seed| {
            Box::new(Calibration2Activity::new(seed))
        }),
        info("bj", "BJ megamix", true, |seed| Box::new(BjActivity::new(seed))),
        info("fast-slow", "Fast/slow", true, |seed| {
            Box::new(FastSlowActivity::new(seed))
        }),
        info("additive", "Additive", true, |seed| {
            Box::new(AdditiveActivity::new(seed))
        }),
        info("simplex", "Simplex", true, |seed| {
            Box::new(SimplexActivity::new(seed))
        }),
        info("simplex-pro", "Simplex Pro", true, |seed| {
            Box::new(SimplexActivity::pro(seed))
        }),
        info("simplex-turbo", "Simplex Turbo", true, |seed| {
            Box::new(SimplexActivity::turbo(seed))
        }),
        info("relentless", "Relentless", true, |seed| {
            Box::new(RelentlessActivity::new(seed))
        }),
        info("random-shapes", "Random shapes", true, |seed| {
            Box::new(RandomShapesActivity::new(seed))
        }),
    ]
}

/// Looks an activity up by its `name`.
pub fn find_activity(name: &str) -> Option<ActivityInfo> {
    available_activities()
        .into_iter()
        .find(|info| info.name == name)
}

/// Host tuning.
///
/// Fields:
/// - `activity_change_probability`: weight for automatic changes, see
///   [`ActivityHost::update_state`]
/// - `seed`: seeds the host's own choices and, through them, every activity it builds
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HostConfig {
    pub activity_change_probability: f64,
    pub seed: u64,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            activity_change_probability: DEFAULT_ACTIVITY_CHANGE_PROBABILITY,
            seed: DEFAULT_HOST_SEED,
        }
    }
}

/// Owns the current activity and turns absolute playback times into simulation steps.
pub struct ActivityHost {
    config: HostConfig,
    rng: StdRng,
    activities: Vec<ActivityInfo>,
    current_info: Option<ActivityInfo>,
    current: Option<Box<dyn Activity>>,
    last_update_time: Option<f64>,
    last_simulation_time: Option<f64>,
}

impl Default for ActivityHost {
    fn default() -> Self {
        Self::new(HostConfig::default())
    }
}

impl ActivityHost {
    /// Creates a host with no activity; it outputs silence until one is set.
    pub fn new(config: HostConfig) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(config.seed),
            activities: available_activities(),
            current_info: None,
            current: None,
            last_update_time: None,
            last_simulation_time: None,
        }
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    pub fn set_activity_change_probability(&mut self, probability: f64) {
        self.config.activity_change_probability = probability.clamp(0.0, 1.0);
    }

    pub fn activities(&self) -> &[ActivityInfo] {
        &self.activities
    }

    pub fn current_activity(&self) -> Option<&ActivityInfo> {
        self.current_info.as_ref()
    }

    /// Replaces the current activity with a freshly built and initialised `info`.
    pub fn set_activity(&mut self, info: ActivityInfo) {
        let seed = self.rng.gen();
        let mut activity = (info.factory)(seed);
        activity.initialise();
        log::info!("activity: {} (seed {seed:#x})", info.display_name);
        self.current = Some(activity);
        self.current_info = Some(info);
        self.last_simulation_time = None;
        self.last_update_time = None;
    }

    /// Switches by registry name.
    pub fn set_activity_by_name(&mut self, name: &str) -> anyhow::Result<()> {
        let info = self
            .activities
            .iter()
            .copied()
            .find(|info| info.name == name)
            .ok_or_else(|| anyhow::anyhow!("unknown activity '{name}'"))?;
        self.set_activity(info);
        Ok(())
    }

    /// Switches to a random selectable activity other than the current one.
    pub fn change_activity(&mut self) {
        let current = self.current_info;
        let mut candidates: Vec<ActivityInfo> = self
            .activities
            .iter()
            .copied()
            .filter(|info| info.randomly_select && Some(*info) != current)
            .collect();
        if candidates.is_empty() {
            candidates = self
                .activities
                .iter()
                .copied()
                .filter(|info| info.randomly_select)
                .collect();
        }
        match candidates.choose(&mut self.rng).copied() {
            Some(info) => self.set_activity(info),
            None => log::warn!("no randomly selectable activities"),
        }
    }

    /// Possibly switches activity, with probability proportional to the time since the
    /// previous call. The first call, and any call with an earlier `time`, only resynchronises.
    pub fn update_state(&mut self, time: f64) {
        let last = match self.last_update_time {
            Some(last) if last <= time => last,
            _ => time,
        };
        let delta = time - last;
        let probability = self.config.activity_change_probability
            * ACTIVITY_CHANGES_PER_MINUTE_AT_FULL
            * delta
            / 60.0;
        if self.rng.gen::<f64>() < probability {
            self.change_activity();
        }
        self.last_update_time = Some(time);
    }

    /// Advances the current activity to `time` and returns its pulse.
    ///
    /// The first call after an activity change, and any call with an earlier `time` than the
    /// last, simulates nothing. With no activity the pulse is silent.
    pub fn pulse_at_time(&mut self, time: f64) -> Pulse {
        let last = match self.last_simulation_time {
            Some(last) if last <= time => last,
            _ => time,
        };
        let delta = time - last;
        self.last_simulation_time = Some(time);

        match self.current.as_mut() {
            Some(activity) => {
                activity.run_simulation(delta);
                activity.pulse()
            }
            None => Pulse::default(),
        }
    }
}
