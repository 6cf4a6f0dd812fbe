//! Reading a located zone into a `TransitionTable`.

use zone_transitions_provider::{DecodeError, TransitionDecoder, TzifDecoder, ZoneSource};

use crate::TransitionTable;

/// Decodes located zones and normalizes zones without transitions.
#[derive(Debug, Clone, Default)]
pub struct TransitionTableReader<D = TzifDecoder> {
    decoder: D,
}

impl<D: TransitionDecoder> TransitionTableReader<D> {
    pub fn new(decoder: D) -> Self {
        Self { decoder }
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// Decodes `zone_name` from `source`.
    ///
    /// A zone the decoder reports no transitions for becomes the
    /// degenerate single entry table. Decoder errors are returned as is.
    pub fn read(
        &self,
        source: &ZoneSource,
        zone_name: &str,
    ) -> Result<TransitionTable, DecodeError> {
        let raw = self.decoder.decode(source, zone_name)?;
        if raw.is_empty() {
            trace!("{zone_name} has no transitions, using a fixed zero offset");
        }
        Ok(TransitionTable::from_raw(raw))
    }
}
