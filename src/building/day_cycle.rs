use crate::{
    grid::manager::BuildingGridManager,
    schedule::UpdateStage,
    settings::{Settings, MIN_SECONDS_PER_DAY},
};
use bevy::prelude::*;

pub struct DayCyclePlugin;

impl Plugin for DayCyclePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<OnNewDay>()
            .add_systems(Startup, spawn_day_clock)
            .add_systems(
                Update,
                (tick_day_clock, run_daily_updates).chain().in_set(UpdateStage::Simulation),
            );
    }
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct OnNewDay(pub u32);

#[derive(Resource, Debug, Clone)]
pub struct DayClock {
    seconds_per_day: f32,
    elapsed: f32,
    day: u32,
}

impl DayClock {
    pub fn new(seconds_per_day: f32) -> Self {
        Self {
            seconds_per_day: seconds_per_day.max(MIN_SECONDS_PER_DAY),
            elapsed: 0.0,
            day: 0,
        }
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// Fraction of the current day that has passed, in `[0, 1)`.
    pub fn progress(&self) -> f32 {
        self.elapsed / self.seconds_per_day
    }

    /// Accumulates `delta` seconds and returns every day index that began.
    pub fn advance(&mut self, delta: f32) -> Vec<u32> {
        self.elapsed += delta.max(0.0);

        let mut started = Vec::new();
        while self.elapsed >= self.seconds_per_day {
            self.elapsed -= self.seconds_per_day;
            self.day += 1;
            started.push(self.day);
        }
        started
    }
}

fn spawn_day_clock(mut commands: Commands, settings: Res<Settings>) {
    commands.insert_resource(DayClock::new(settings.simulation.seconds_per_day));
}

fn tick_day_clock(time: Res<Time>, mut clock: ResMut<DayClock>, mut new_day: EventWriter<OnNewDay>) {
    for day in clock.advance(time.delta_seconds()) {
        log::info!("Day {} begins", day);
        new_day.send(OnNewDay(day));
    }
}

fn run_daily_updates(mut new_day: EventReader<OnNewDay>, mut manager: ResMut<BuildingGridManager>) {
    for OnNewDay(day) in new_day.read() {
        for id in manager.on_daily_update() {
            if let Some(building) = manager.building(id) {
                log::info!(
                    "{} at {} is open for business on day {}",
                    building.building_type().display_name(),
                    building.origin(),
                    day
                );
            }
        }
    }
}
