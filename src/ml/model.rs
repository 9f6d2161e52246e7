use burn::{
    nn::{Embedding, EmbeddingConfig, Initializer},
    prelude::*,
    tensor::activation::{log_softmax, softmax},
};

// #[derive(Config)] already implements Clone and Serialize/Deserialize;
// deriving them again gives conflicting impls.
#[derive(Config, Debug)]
pub struct MemN2NConfig {
    pub vocab_size:     usize,
    pub sentence_size:  usize,
    pub embedding_size: usize,
    #[config(default = 3)]
    pub hops:           usize,
    #[config(default = 0.1)]
    pub init_std:       f64,
}

impl MemN2NConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> MemN2N<B> {
        // Adjacent weight tying: table k is the output memory of hop k-1
        // and the input memory of hop k, so hops + 1 tables in total.
        let embeddings = (0..=self.hops)
            .map(|_| {
                EmbeddingConfig::new(self.vocab_size, self.embedding_size)
                    .with_initializer(Initializer::Normal { mean: 0.0, std: self.init_std })
                    .init(device)
            })
            .collect();

        MemN2N {
            embeddings,
            sentence_size: self.sentence_size,
        }
    }
}

/// Position encoding weights, row-major [sentence_size, embedding_size].
///
/// l[j][i] = 1 + 4 (i - (d+1)/2) (j - (s+1)/2) / (d s), 1-based i and j.
/// The last word position (the time slot) is all ones.
pub fn position_encoding(sentence_size: usize, embedding_size: usize) -> Vec<f32> {
    let s = sentence_size as f32;
    let d = embedding_size as f32;
    let mut enc = Vec::with_capacity(sentence_size * embedding_size);

    for j in 1..=sentence_size {
        for i in 1..=embedding_size {
            let value = if j == sentence_size {
                1.0
            } else {
                1.0 + 4.0 * (i as f32 - (d + 1.0) / 2.0) * (j as f32 - (s + 1.0) / 2.0) / d / s
            };
            enc.push(value);
        }
    }

    enc
}

/// Look up `ids` and zero out nil (index 0) positions.
fn embed<B: Backend>(table: &Embedding<B>, ids: Tensor<B, 2, Int>) -> Tensor<B, 3> {
    let mask = ids.clone().not_equal_elem(0).float().unsqueeze_dim::<3>(2);
    table.forward(ids) * mask
}

#[derive(Module, Debug)]
pub struct MemN2N<B: Backend> {
    pub embeddings:    Vec<Embedding<B>>,
    pub sentence_size: usize,
}

impl<B: Backend> MemN2N<B> {
    pub fn hops(&self) -> usize {
        self.embeddings.len() - 1
    }

    fn encoding(&self, embedding_size: usize, device: &B::Device) -> Tensor<B, 2> {
        let enc = position_encoding(self.sentence_size, embedding_size);
        Tensor::<B, 1>::from_floats(enc.as_slice(), device)
            .reshape([self.sentence_size, embedding_size])
    }

    /// Embed every memory slot with `table`: [batch, memory, sentence] → [batch, memory, d]
    fn embed_memory(
        &self,
        table:    &Embedding<B>,
        stories:  Tensor<B, 3, Int>,
        encoding: Tensor<B, 2>,
    ) -> Tensor<B, 3> {
        let [batch_size, memory_size, sentence_size] = stories.dims();
        let flat = stories.reshape([batch_size, memory_size * sentence_size]);
        let emb = embed(table, flat);
        let [_, _, d] = emb.dims();

        (emb.reshape([batch_size, memory_size, sentence_size, d]) * encoding.unsqueeze::<4>())
            .sum_dim(2)
            .squeeze::<3>(2)
    }

    /// stories: [batch, memory, sentence], queries: [batch, sentence] → logits [batch, vocab]
    pub fn forward(&self, stories: Tensor<B, 3, Int>, queries: Tensor<B, 2, Int>) -> Tensor<B, 2> {
        let device = queries.device();
        let query_table = &self.embeddings[0];
        let [_, d] = query_table.weight.val().dims();
        let encoding = self.encoding(d, &device);

        // Controller state u: position-weighted bag of query words [batch, d]
        let mut u = (embed(query_table, queries) * encoding.clone().unsqueeze::<3>())
            .sum_dim(1)
            .squeeze::<2>(1);

        for hop in 0..self.hops() {
            let m_in = self.embed_memory(&self.embeddings[hop], stories.clone(), encoding.clone());
            let m_out =
                self.embed_memory(&self.embeddings[hop + 1], stories.clone(), encoding.clone());

            // Attention over memory slots [batch, memory]
            let scores = (m_in * u.clone().unsqueeze_dim::<3>(1)).sum_dim(2).squeeze::<2>(2);
            let probs = softmax(scores, 1);

            let o = (m_out * probs.unsqueeze_dim::<3>(2)).sum_dim(1).squeeze::<2>(1);
            u = u + o;
        }

        let output_table = self.embeddings[self.hops()].weight.val();
        u.matmul(output_table.transpose())
    }

    /// Summed softmax cross-entropy against one-hot answers.
    pub fn forward_loss(
        &self,
        stories: Tensor<B, 3, Int>,
        queries: Tensor<B, 2, Int>,
        answers: Tensor<B, 2>,
    ) -> Tensor<B, 1> {
        let logits = self.forward(stories, queries);
        (log_softmax(logits, 1) * answers).sum().neg()
    }

    /// Argmax answer index per example
    pub fn predict(&self, stories: Tensor<B, 3, Int>, queries: Tensor<B, 2, Int>) -> Vec<usize> {
        self.forward(stories, queries)
            .argmax(1)
            .into_data()
            .iter::<i64>()
            .map(|label| label as usize)
            .collect()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn model(hops: usize) -> MemN2N<TestBackend> {
        MemN2NConfig::new(10, 4, 6).with_hops(hops).init(&Default::default())
    }

    fn inputs() -> (Tensor<TestBackend, 3, Int>, Tensor<TestBackend, 2, Int>) {
        let device = Default::default();
        let stories = Tensor::<TestBackend, 1, Int>::from_ints(
            [0, 0, 0, 0, 0, 1, 2, 9, 0, 3, 4, 8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 5, 6, 8].as_slice(),
            &device,
        )
        .reshape([2, 3, 4]);
        let queries =
            Tensor::<TestBackend, 1, Int>::from_ints([1, 0, 0, 0, 5, 6, 0, 0].as_slice(), &device)
                .reshape([2, 4]);
        (stories, queries)
    }

    #[test]
    fn test_position_encoding_time_slot_is_identity() {
        let enc = position_encoding(5, 4);
        assert_eq!(enc.len(), 20);
        assert!(enc[16..].iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_position_encoding_values() {
        // s = 3, d = 2: l[1][1] = 1 + 4 (1 - 1.5)(1 - 2) / 6
        let enc = position_encoding(3, 2);
        assert_relative_eq!(enc[0], 1.0 + 4.0 * 0.5 / 6.0, epsilon = 1e-6);
        assert_relative_eq!(enc[1], 1.0 - 4.0 * 0.5 / 6.0, epsilon = 1e-6);
        // Middle word position is neutral for odd sentence sizes
        assert_relative_eq!(enc[2], 1.0, epsilon = 1e-6);
        assert_relative_eq!(enc[3], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_hops_and_tables() {
        let m = model(3);
        assert_eq!(m.hops(), 3);
        assert_eq!(m.embeddings.len(), 4);
        assert_eq!(m.embeddings[0].weight.val().dims(), [10, 6]);
    }

    #[test]
    fn test_forward_shape() {
        let (stories, queries) = inputs();
        for hops in 1..=3 {
            let logits = model(hops).forward(stories.clone(), queries.clone());
            assert_eq!(logits.dims(), [2, 10]);
        }
    }

    #[test]
    fn test_loss_is_positive_scalar() {
        let (stories, queries) = inputs();
        let device = Default::default();
        let mut one_hot = vec![0.0f32; 20];
        one_hot[3] = 1.0;
        one_hot[17] = 1.0;
        let answers =
            Tensor::<TestBackend, 1>::from_floats(one_hot.as_slice(), &device).reshape([2, 10]);

        let loss = model(2).forward_loss(stories, queries, answers);
        assert_eq!(loss.dims(), [1]);
        let value: f32 = loss.into_scalar();
        assert!(value.is_finite());
        assert!(value > 0.0);
    }

    #[test]
    fn test_nil_only_query_gives_zero_controller() {
        // An all-nil query and all-nil story leave u at zero, so every logit is zero
        let device = Default::default();
        let stories = Tensor::<TestBackend, 3, Int>::zeros([1, 2, 4], &device);
        let queries = Tensor::<TestBackend, 2, Int>::zeros([1, 4], &device);
        let logits: Vec<f32> = model(1)
            .forward(stories, queries)
            .into_data()
            .iter::<f32>()
            .collect();
        assert!(logits.iter().all(|&v| v.abs() < 1e-6));
    }

    #[test]
    fn test_predict_returns_one_label_per_example() {
        let (stories, queries) = inputs();
        let labels = model(3).predict(stories, queries);
        assert_eq!(labels.len(), 2);
        assert!(labels.iter().all(|&l| l < 10));
    }
}
