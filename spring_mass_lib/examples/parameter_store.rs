use std::path::Path;

use spring_mass_lib::beats::BeatParameters;
use spring_mass_lib::{OscillatorParameters, ParameterStore};

fn main() {
    let oscillator_default = OscillatorParameters {
        step_count: 250,
        ..Default::default()
    };

    let beats_default = BeatParameters {
        f2: 441.0,
        ..Default::default()
    };

    let mut store = ParameterStore::new(Path::new("test.toml"), "test_run").unwrap();

    let oscillator = OscillatorParameters::from_store(&mut store, oscillator_default).unwrap();
    let beats = BeatParameters::from_store(&mut store, beats_default).unwrap();

    println!("{:?}", oscillator);
    println!("{:?}", beats);

    store.save().unwrap();
}
