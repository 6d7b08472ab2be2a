use std::sync::atomic::Ordering;
use std::time::Instant;

use tracing::{info, warn};

use crate::data::sample::Sample;
use crate::error::{ensure_len, Error, Result};
use crate::network::model::Model;
use crate::optim::sgd::Sgd;
use crate::train::epoch_stats::EpochStats;
use crate::train::step::train_step;
use crate::train::train_config::TrainConfig;

/// How a `train_loop` run ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainOutcome {
    pub epochs_completed: usize,
    /// Mean loss of the last completed epoch; `None` when no epoch ran.
    pub last_loss: Option<f32>,
    /// True when the stop flag or a dropped progress receiver ended the run.
    pub stopped_early: bool,
}

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `model` in place for `config.epochs` epochs of per-example SGD.
///
/// Samples are visited in dataset order, never shuffled. At the end of each
/// epoch the mean loss is logged and, if configured, sent as [`EpochStats`].
///
/// # Errors
/// - `EmptyDataset` if `dataset` is empty
/// - `DimensionMismatch` if any sample disagrees with the model's sizes;
///   the whole dataset is checked before the first update
/// - `InvalidConfig` for a bad learning rate or a target that is not one-hot
/// - `NonFiniteLoss` only when `config.check_finite` is set
///
/// # Early termination
/// The stop flag and the progress channel are only consulted at epoch
/// boundaries, so the model is never left mid-epoch.
pub fn train_loop(model: &mut Model, dataset: &[Sample], config: &TrainConfig) -> Result<TrainOutcome> {
    if dataset.is_empty() {
        return Err(Error::EmptyDataset);
    }
    for sample in dataset {
        ensure_len("sample input", model.input_size(), sample.input.len())?;
        ensure_len("sample target", model.output_size(), sample.target.len())?;
        sample.check_one_hot()?;
    }
    let optimizer = Sgd::new(config.learning_rate)?;

    let mut outcome = TrainOutcome { epochs_completed: 0, last_loss: None, stopped_early: false };

    for epoch in 1..=config.epochs {
        if stop_requested(config) {
            warn!(epoch, "training stopped before epoch");
            outcome.stopped_early = true;
            break;
        }

        let t_start = Instant::now();

        // ── One full pass over the data ───────────────────────────────────
        let mut total_loss = 0.0f32;
        for (idx, sample) in dataset.iter().enumerate() {
            let loss = train_step(
                model,
                &sample.input,
                &sample.target,
                &optimizer,
                config.backprop,
                config.hidden_mask,
            )?;
            if config.check_finite && !loss.is_finite() {
                return Err(Error::NonFiniteLoss { epoch, sample: idx });
            }
            total_loss += loss;
        }
        let mean_loss = total_loss / dataset.len() as f32;

        outcome.epochs_completed = epoch;
        outcome.last_loss = Some(mean_loss);

        let elapsed_ms = t_start.elapsed().as_millis() as u64;
        info!(epoch, total = config.epochs, loss = mean_loss, elapsed_ms, "epoch complete");

        // ── Emit progress ─────────────────────────────────────────────────
        if let Some(ref tx) = config.progress_tx {
            let stats = EpochStats { epoch, total_epochs: config.epochs, mean_loss, elapsed_ms };
            // A dropped receiver means nobody is waiting for the rest.
            if tx.send(stats).is_err() {
                if epoch < config.epochs {
                    warn!(epoch, "progress receiver dropped, stopping");
                    outcome.stopped_early = true;
                }
                break;
            }
        }
    }

    Ok(outcome)
}

fn stop_requested(config: &TrainConfig) -> bool {
    config.stop_flag.as_ref().is_some_and(|flag| flag.load(Ordering::Relaxed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use std::sync::{mpsc, Arc};

    fn xor_like() -> Vec<Sample> {
        vec![
            Sample::one_hot(vec![1.0, 0.0], 0, 2).unwrap(),
            Sample::one_hot(vec![0.0, 1.0], 1, 2).unwrap(),
        ]
    }

    #[test]
    fn empty_dataset_is_reported() {
        let mut model = Model::with_seed(2, 2, 2, 0).unwrap();
        let before = model.clone();
        let err = train_loop(&mut model, &[], &TrainConfig::new(3, 0.1)).unwrap_err();
        assert!(matches!(err, Error::EmptyDataset));
        assert_eq!(model, before);
    }

    #[test]
    fn mismatched_sample_is_rejected_before_any_update() {
        let mut model = Model::with_seed(2, 2, 2, 0).unwrap();
        let before = model.clone();
        let mut data = xor_like();
        data.push(Sample::one_hot(vec![1.0, 1.0, 1.0], 0, 2).unwrap());
        let err = train_loop(&mut model, &data, &TrainConfig::new(3, 0.1)).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { what: "sample input", .. }));
        assert_eq!(model, before);
    }

    #[test]
    fn soft_target_is_rejected_before_any_update() {
        let mut model = Model::with_seed(1, 2, 2, 0).unwrap();
        let before = model.clone();
        let soft = Sample { input: vec![1.0], target: vec![0.5, 0.5] };
        let err = train_loop(&mut model, &[soft], &TrainConfig::new(1, 0.1)).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        assert_eq!(model, before);
    }

    #[test]
    fn zero_epochs_is_a_no_op() {
        let mut model = Model::with_seed(2, 2, 2, 0).unwrap();
        let before = model.clone();
        let outcome = train_loop(&mut model, &xor_like(), &TrainConfig::new(0, 0.1)).unwrap();
        assert_eq!(outcome.epochs_completed, 0);
        assert_eq!(outcome.last_loss, None);
        assert_eq!(model, before);
    }

    #[test]
    fn sends_one_stats_per_epoch() {
        let (tx, rx) = mpsc::channel();
        let mut config = TrainConfig::new(4, 0.1);
        config.progress_tx = Some(tx);
        let mut model = Model::with_seed(2, 3, 2, 1).unwrap();
        let outcome = train_loop(&mut model, &xor_like(), &config).unwrap();
        drop(config);

        let stats: Vec<EpochStats> = rx.iter().collect();
        assert_eq!(stats.len(), 4);
        assert_eq!(stats.iter().map(|s| s.epoch).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
        assert!(stats.iter().all(|s| s.total_epochs == 4 && s.mean_loss.is_finite()));
        assert_eq!(outcome.last_loss, Some(stats[3].mean_loss));
        assert!(!outcome.stopped_early);
    }

    #[test]
    fn stop_flag_halts_at_epoch_boundary() {
        let flag = Arc::new(AtomicBool::new(true));
        let mut config = TrainConfig::new(10, 0.1);
        config.stop_flag = Some(flag);
        let mut model = Model::with_seed(2, 2, 2, 0).unwrap();
        let before = model.clone();
        let outcome = train_loop(&mut model, &xor_like(), &config).unwrap();
        assert!(outcome.stopped_early);
        assert_eq!(outcome.epochs_completed, 0);
        assert_eq!(model, before);
    }

    #[test]
    fn dropped_receiver_stops_after_current_epoch() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let mut config = TrainConfig::new(10, 0.1);
        config.progress_tx = Some(tx);
        let mut model = Model::with_seed(2, 2, 2, 0).unwrap();
        let outcome = train_loop(&mut model, &xor_like(), &config).unwrap();
        assert_eq!(outcome.epochs_completed, 1);
        assert!(outcome.stopped_early);
    }

    #[test]
    fn finite_check_catches_blow_up() {
        // Input large enough to overflow the logits to infinity.
        let data = vec![Sample::one_hot(vec![f32::MAX], 0, 2).unwrap()];
        let w1 = crate::math::matrix::Matrix::from_data(vec![vec![1.0]]).unwrap();
        let w2 = crate::math::matrix::Matrix::from_data(vec![vec![10.0, -10.0]]).unwrap();
        let model = Model::from_parts(w1, vec![0.0], w2, vec![0.0, 0.0]).unwrap();

        let mut config = TrainConfig::new(1, 0.1);
        config.check_finite = true;
        let err = train_loop(&mut model.clone(), &data, &config).unwrap_err();
        assert!(matches!(err, Error::NonFiniteLoss { epoch: 1, sample: 0 }));

        config.check_finite = false;
        assert!(train_loop(&mut model.clone(), &data, &config).is_ok());
    }
}
