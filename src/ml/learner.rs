// ============================================================
// Layer 5 — MemN2N Learner
// ============================================================
// Owns the MemN2N module, its SGD optimiser and the device,
// and exposes them through the MemoryModel trait:
//
//   batch_fit  — forward, summed cross-entropy, backward,
//                gradient-norm clipping, SGD step
//   predict    — forward on the inner (non-autodiff) backend,
//                argmax over the vocabulary
//
// Training uses B (an AutodiffBackend). model.valid() returns
// the same module on B::InnerBackend, which shares B's device.

use anyhow::{ensure, Result};
use burn::{
    data::dataloader::batcher::Batcher,
    grad_clipping::GradientClippingConfig,
    module::AutodiffModule,
    optim::{GradientsParams, Optimizer, SgdConfig},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::data::batcher::MemBatcher;
use crate::domain::{example::VectorizedItem, traits::MemoryModel};
use crate::ml::model::{MemN2N, MemN2NConfig};

pub struct MemN2NLearner<B: AutodiffBackend, O> {
    model:           MemN2N<B>,
    optim:           O,
    device:          B::Device,
    eval_batch_size: usize,
}

/// Build a learner with plain SGD and per-parameter norm clipping.
///
/// The learning rate is passed on every step, so the annealing
/// schedule scales the raw clipped gradient.
pub fn build_learner<B: AutodiffBackend>(
    model_cfg:       &MemN2NConfig,
    max_grad_norm:   f64,
    eval_batch_size: usize,
    device:          B::Device,
) -> MemN2NLearner<B, impl Optimizer<MemN2N<B>, B>> {
    let model: MemN2N<B> = model_cfg.init(&device);
    let optim = SgdConfig::new()
        .with_gradient_clipping(Some(GradientClippingConfig::Norm(max_grad_norm as f32)))
        .init();

    tracing::info!(
        "Model ready: {} hops, embedding_size={}, vocab_size={}",
        model_cfg.hops,
        model_cfg.embedding_size,
        model_cfg.vocab_size
    );

    MemN2NLearner::new(model, optim, device, eval_batch_size)
}

impl<B, O> MemN2NLearner<B, O>
where
    B: AutodiffBackend,
    O: Optimizer<MemN2N<B>, B>,
{
    pub fn new(model: MemN2N<B>, optim: O, device: B::Device, eval_batch_size: usize) -> Self {
        Self {
            model,
            optim,
            device,
            eval_batch_size: eval_batch_size.max(1),
        }
    }
}

impl<B, O> MemoryModel for MemN2NLearner<B, O>
where
    B: AutodiffBackend,
    O: Optimizer<MemN2N<B>, B>,
{
    fn batch_fit(&mut self, batch: &[VectorizedItem], learning_rate: f64) -> Result<f64> {
        if batch.is_empty() {
            return Ok(0.0);
        }

        let batch = MemBatcher::<B>::new(self.device.clone()).batch(batch.to_vec());
        let loss = self
            .model
            .forward_loss(batch.stories, batch.queries, batch.answers);

        let cost: f64 = loss.clone().into_scalar().elem::<f64>();
        ensure!(cost.is_finite(), "Training diverged: batch cost is {cost}");

        // Backward pass + SGD update
        let grads = loss.backward();
        let grads = GradientsParams::from_grads(grads, &self.model);
        self.model = self.optim.step(learning_rate, self.model.clone(), grads);

        Ok(cost)
    }

    fn predict(&self, items: &[VectorizedItem]) -> Result<Vec<usize>> {
        // No autodiff bookkeeping during evaluation
        let model = self.model.valid();
        let batcher = MemBatcher::<B::InnerBackend>::new(self.device.clone());

        let mut predictions = Vec::with_capacity(items.len());
        for chunk in items.chunks(self.eval_batch_size) {
            let batch = batcher.batch(chunk.to_vec());
            predictions.extend(model.predict(batch.stories, batch.queries));
        }
        Ok(predictions)
    }
}
