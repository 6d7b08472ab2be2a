use crate::activation::activation::HiddenGradientMask;
use crate::error::Result;
use crate::loss::cross_entropy::CrossEntropyLoss;
use crate::network::model::Model;
use crate::optim::sgd::Sgd;
use crate::train::train_config::BackpropOrder;

/// One SGD step on one example: forward, loss, backward, update.
///
/// Returns the example's cross-entropy loss measured before the update.
/// The caller has already checked the sample's dimensions against the model.
pub(crate) fn train_step(
    model: &mut Model,
    input: &[f32],
    target: &[f32],
    optimizer: &Sgd,
    backprop: BackpropOrder,
    hidden_mask: HiddenGradientMask,
) -> Result<f32> {
    let pass = model.forward(input)?;
    let loss = CrossEntropyLoss::loss(&pass.probs, target);
    let d_out = CrossEntropyLoss::derivative(&pass.probs, target);

    // Output layer: update w2/b2 and accumulate the hidden gradient in one sweep.
    let mut d_hidden = vec![0.0f32; model.hidden_size()];
    for (k, &grad) in d_out.iter().enumerate() {
        for (j, &h) in pass.hidden.iter().enumerate() {
            let w = &mut model.w2[(j, k)];
            match backprop {
                BackpropOrder::PreUpdate => {
                    d_hidden[j] += grad * *w;
                    optimizer.apply(w, grad * h);
                }
                BackpropOrder::InPlace => {
                    optimizer.apply(w, grad * h);
                    d_hidden[j] += grad * *w;
                }
            }
        }
        optimizer.apply(&mut model.b2[k], grad);
    }

    for (grad, &z) in d_hidden.iter_mut().zip(&pass.hidden_raw) {
        *grad = hidden_mask.apply(z, *grad);
    }

    // Input layer.
    for (j, &grad) in d_hidden.iter().enumerate() {
        for (i, &x) in input.iter().enumerate() {
            optimizer.apply(&mut model.w1[(i, j)], grad * x);
        }
        optimizer.apply(&mut model.b1[j], grad);
    }

    Ok(loss)
}
