//! Traced network layers for the recurrent classifier.
//!
//! Thin wrappers around `candle_nn` layers that enter a `tracing` span on
//! every forward pass, plus a bidirectional LSTM built from two
//! unidirectional `candle_nn` LSTMs.

use candle_core::{Module, Result, Tensor};
use candle_nn::rnn::{LSTMConfig, LSTMState, LSTM, RNN};
use candle_nn::VarBuilder;

#[derive(Debug, Clone)]
pub struct Embedding {
    inner: candle_nn::Embedding,
    span: tracing::Span,
}

impl Embedding {
    pub fn new(vocab_size: usize, dim: usize, vb: VarBuilder) -> Result<Self> {
        let inner = candle_nn::embedding(vocab_size, dim, vb)?;
        let span = tracing::span!(tracing::Level::TRACE, "embedding");
        Ok(Self { inner, span })
    }

    pub fn embeddings(&self) -> &Tensor {
        self.inner.embeddings()
    }
}

impl Module for Embedding {
    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        let _enter = self.span.enter();
        self.inner.forward(xs)
    }
}

#[derive(Debug, Clone)]
pub struct Linear {
    inner: candle_nn::Linear,
    span: tracing::Span,
}

impl Linear {
    pub fn new(in_dim: usize, out_dim: usize, vb: VarBuilder) -> Result<Self> {
        let inner = candle_nn::linear(in_dim, out_dim, vb)?;
        let span = tracing::span!(tracing::Level::TRACE, "linear");
        Ok(Self { inner, span })
    }
}

impl Module for Linear {
    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        let _enter = self.span.enter();
        self.inner.forward(xs)
    }
}

/// Bidirectional LSTM over `(batch, seq, features)` input.
///
/// The forward LSTM reads the sequence left to right, the backward LSTM reads
/// it right to left. With `return_sequences` the output is
/// `(batch, seq, 2 * hidden)` with the backward states flipped back into time
/// order, otherwise `(batch, 2 * hidden)` from the final state of each
/// direction.
#[derive(Debug, Clone)]
pub struct Bidirectional {
    forward_lstm: LSTM,
    backward_lstm: LSTM,
    hidden_size: usize,
    return_sequences: bool,
    span: tracing::Span,
}

impl Bidirectional {
    pub fn new(
        in_dim: usize,
        hidden_size: usize,
        return_sequences: bool,
        vb: VarBuilder,
    ) -> Result<Self> {
        let forward_lstm =
            candle_nn::lstm(in_dim, hidden_size, LSTMConfig::default(), vb.pp("forward"))?;
        let backward_lstm =
            candle_nn::lstm(in_dim, hidden_size, LSTMConfig::default(), vb.pp("backward"))?;
        let span = tracing::span!(tracing::Level::TRACE, "bilstm");
        Ok(Self {
            forward_lstm,
            backward_lstm,
            hidden_size,
            return_sequences,
            span,
        })
    }

    pub fn output_dim(&self) -> usize {
        2 * self.hidden_size
    }
}

impl Module for Bidirectional {
    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        let _enter = self.span.enter();
        let reversed = reverse_time(xs)?;
        let forward_states = self.forward_lstm.seq(xs)?;
        let backward_states = self.backward_lstm.seq(&reversed)?;

        if self.return_sequences {
            let forward = self.forward_lstm.states_to_tensor(&forward_states)?;
            let backward =
                reverse_time(&self.backward_lstm.states_to_tensor(&backward_states)?)?;
            Tensor::cat(&[&forward, &backward], 2)
        } else {
            let forward = last_hidden(&forward_states)?;
            let backward = last_hidden(&backward_states)?;
            Tensor::cat(&[forward, backward], 1)
        }
    }
}

fn last_hidden(states: &[LSTMState]) -> Result<&Tensor> {
    match states.last() {
        Some(state) => Ok(state.h()),
        None => candle_core::bail!("bidirectional lstm received an empty sequence"),
    }
}

/// Flips the time axis (dim 1) of a `(batch, seq, ...)` tensor.
pub fn reverse_time(xs: &Tensor) -> Result<Tensor> {
    let seq_len = xs.dim(1)?;
    let order: Vec<u32> = (0..seq_len as u32).rev().collect();
    let order = Tensor::from_vec(order, seq_len, xs.device())?;
    xs.index_select(&order, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::{DType, Device};
    use candle_nn::VarMap;

    #[test]
    fn reverse_time_flips_only_the_sequence_axis() -> Result<()> {
        let xs = Tensor::arange(0u32, 12, &Device::Cpu)?.reshape((2, 3, 2))?;
        let reversed = reverse_time(&xs)?;
        assert_eq!(
            reversed.to_vec3::<u32>()?,
            vec![
                vec![vec![4, 5], vec![2, 3], vec![0, 1]],
                vec![vec![10, 11], vec![8, 9], vec![6, 7]],
            ]
        );
        Ok(())
    }

    #[test]
    fn bidirectional_output_shapes() -> Result<()> {
        let device = Device::Cpu;
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        let xs = Tensor::randn(0f32, 1.0, (2, 5, 4), &device)?;

        let seq = Bidirectional::new(4, 3, true, vb.pp("seq"))?;
        assert_eq!(seq.forward(&xs)?.dims(), &[2, 5, 6]);

        let last = Bidirectional::new(4, 3, false, vb.pp("last"))?;
        assert_eq!(last.forward(&xs)?.dims(), &[2, 6]);
        assert_eq!(last.output_dim(), 6);
        Ok(())
    }
}
