//! Headless counter application: a step slider and a counter with +/- buttons
//!
//! Run with `RUST_LOG=tincan_redux=debug` to see dispatch logging.

use tincan_redux::hooks::equality;
use tincan_redux::{
    context, use_dispatch, use_selector, use_selector_with, BindingError, Dispatch, Selected,
    Store,
};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug, PartialEq)]
struct CounterState {
    counter: i64,
    step_size: i64,
}

impl Default for CounterState {
    fn default() -> Self {
        Self {
            counter: 1,
            step_size: 1,
        }
    }
}

#[derive(Clone, Debug)]
enum CounterAction {
    UpdateCounter(i64),
    ChangeStepSize(i64),
}

// Action creators
fn update_counter(value: i64) -> CounterAction {
    CounterAction::UpdateCounter(value)
}

fn change_step_size(value: i64) -> CounterAction {
    CounterAction::ChangeStepSize(value)
}

fn reducer(state: &CounterState, action: &CounterAction) -> CounterState {
    match action {
        CounterAction::UpdateCounter(delta) => CounterState {
            counter: state.counter.saturating_add(*delta),
            ..state.clone()
        },
        CounterAction::ChangeStepSize(step_size) => CounterState {
            step_size: *step_size,
            ..state.clone()
        },
    }
}

const STEP_RANGE: std::ops::RangeInclusive<i64> = 1..=5;

/// Step slider. Re-renders only when the step size changes.
struct Step {
    step_size: Selected<i64>,
    dispatch: Dispatch<CounterState, CounterAction>,
}

impl Step {
    fn mount() -> Result<Self, BindingError> {
        let step_size = use_selector::<CounterState, CounterAction, _>(|s| s.step_size)?;
        step_size.on_change(|step| println!("   [Step] current step size: {step}"));
        Ok(Self {
            step_size,
            dispatch: use_dispatch()?,
        })
    }

    fn slide(&self, value: i64) {
        let value = value.clamp(*STEP_RANGE.start(), *STEP_RANGE.end());
        self.dispatch.dispatch(change_step_size(value));
    }

    fn render(&self) {
        println!(
            "   [Step] counter moves by the step size; current step size: {}",
            self.step_size.get()
        );
    }
}

/// Counter with decrement/increment buttons. Selects the whole state and
/// re-renders on every dispatch.
struct Counter {
    state: Selected<CounterState>,
    dispatch: Dispatch<CounterState, CounterAction>,
}

impl Counter {
    fn mount() -> Result<Self, BindingError> {
        let state =
            use_selector_with::<CounterState, CounterAction, _>(|s| s.clone(), equality::never)?;
        state.on_change(|s| println!("   [Counter] - {} +", s.counter));
        Ok(Self {
            state,
            dispatch: use_dispatch()?,
        })
    }

    fn increment(&self) {
        let step = self.state.with(|s| s.step_size);
        self.dispatch.dispatch(update_counter(step));
    }

    fn decrement(&self) {
        let step = self.state.with(|s| s.step_size);
        self.dispatch.dispatch(update_counter(-step));
    }

    fn render(&self) {
        println!("   [Counter] - {} +", self.state.with(|s| s.counter));
    }
}

fn main() -> Result<(), BindingError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Counter Application ===\n");

    let store = Store::builder(reducer, CounterState::default())
        .name("counter")
        .build();

    context::with_store(store.clone(), || {
        println!("1. Mounting components");
        let step = Step::mount()?;
        let counter = Counter::mount()?;
        step.render();
        counter.render();

        println!("\n2. Incrementing...");
        counter.increment();
        counter.increment();

        println!("\n3. Sliding step size to 5");
        step.slide(5);

        println!("\n4. Decrementing with new step...");
        counter.decrement();
        counter.decrement();

        println!("\n5. Sliding past the maximum");
        step.slide(9);
        println!(
            "   Step renders: {}, Counter renders: {}",
            step.step_size.render_count(),
            counter.state.render_count()
        );

        Ok::<_, BindingError>(())
    })?;

    println!("\n6. Unmounted; live listeners: {}", store.subscriber_count());
    println!("   Final state: {:?}", store.get_state());
    println!("\n✓ Counter application complete!");
    Ok(())
}
