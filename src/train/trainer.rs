use crate::data::sample::Sample;
use crate::error::Result;
use crate::network::model::Model;
use crate::train::loop_fn::train_loop;
use crate::train::train_config::TrainConfig;

/// Trains `model` in place with the default backward-pass behaviour.
///
/// Per-epoch mean loss is reported through `tracing`. Fails with
/// `Error::EmptyDataset` when there is nothing to train on.
pub fn train(model: &mut Model, dataset: &[Sample], epochs: usize, learning_rate: f32) -> Result<()> {
    train_loop(model, dataset, &TrainConfig::new(epochs, learning_rate))?;
    Ok(())
}
