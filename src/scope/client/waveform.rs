use super::ScopeClient;
use crate::error::ScopeError;
use crate::scope::channel::ByteChannel;
use crate::scope::protocol::{self, Protocol};
use crate::types::{WaveformPreamble, WaveformResult};
use log::{debug, warn};

impl<C: ByteChannel> ScopeClient<C> {
    /// Read `points` and `xincrement` from `:WAV:PRE?`.
    pub fn read_waveform_preamble(&mut self) -> Result<WaveformPreamble, ScopeError> {
        debug!("Reading waveform preamble");

        // Not followed by an error check: the reply itself is authoritative.
        let reply = self.query(protocol::WAV_PREAMBLE)?;
        let preamble = Protocol::parse_preamble(&reply)?;

        debug!(
            "Preamble: {} points, {} s per point",
            preamble.points, preamble.xincrement
        );
        Ok(preamble)
    }

    /// Read the on-screen channel 1 waveform in ASCII format.
    ///
    /// Selects the source, normal mode and ASCII format (each checked), reads
    /// the preamble, then fetches `:WAV:DATA?`. The returned time axis starts
    /// at zero and advances by the preamble's `xincrement`.
    ///
    /// The data reply is taken from a single read, so a capture longer than
    /// the receive buffer comes back truncated.
    pub fn read_waveform_data(&mut self) -> Result<WaveformResult, ScopeError> {
        debug!("Setting the channel from which the waveform data will be read");
        self.execute_checked(protocol::WAV_SOURCE_CHAN1)?;

        debug!("Setting the waveform reading mode to read all data displayed on screen");
        self.execute_checked(protocol::WAV_MODE_NORMAL)?;

        debug!("Setting the return format of the waveform data to ASCII");
        self.execute_checked(protocol::WAV_FORMAT_ASCII)?;

        let preamble = self.read_waveform_preamble()?;

        debug!("Querying data");
        // Same as the preamble: no error check after the data query.
        let reply = self.query(protocol::WAV_DATA)?;
        let waveform = Protocol::decode_ascii_samples(&reply, preamble.xincrement)?;

        if waveform.len() != preamble.points as usize {
            warn!(
                "Decoded {} samples but preamble announced {} points",
                waveform.len(),
                preamble.points
            );
        }

        Ok(waveform)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ScopeError;
    use crate::scope::mock::FakeScope;
    use crate::ScopeClient;

    #[test]
    fn test_read_waveform_preamble() {
        let mut fake = FakeScope::new();
        fake.reply(":WAV:PRE?", "PRE,x,1200,y,0.001,z");
        let mut scope = ScopeClient::from_channel(fake);

        let preamble = scope.read_waveform_preamble().unwrap();
        assert_eq!(preamble.points, 1200);
        assert_eq!(preamble.xincrement, 0.001);
        assert_eq!(scope.channel().commands(), [":WAV:PRE?"]);
    }

    #[test]
    fn test_read_waveform_preamble_too_short() {
        let mut fake = FakeScope::new();
        fake.reply(":WAV:PRE?", "0,0,1200");
        let mut scope = ScopeClient::from_channel(fake);

        assert!(matches!(
            scope.read_waveform_preamble(),
            Err(ScopeError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_read_waveform_data() {
        let mut fake = FakeScope::new();
        fake.reply(":WAV:PRE?", "0,0,3,1,0.001,0,0,0.04,0,122,0,0")
            .reply(":WAV:DATA?", "#,1.0,2.0,3.0,!");
        let mut scope = ScopeClient::from_channel(fake);

        let waveform = scope.read_waveform_data().unwrap();
        assert_eq!(waveform.time, vec![0.0, 0.001, 0.002]);
        assert_eq!(waveform.voltage, vec![1.0, 2.0, 3.0]);

        assert_eq!(
            scope.channel().commands(),
            [
                ":WAV:SOUR CHAN1",
                ":SYST:ERR?",
                ":WAV:MODE NORM",
                ":SYST:ERR?",
                ":WAV:FORM ASC",
                ":SYST:ERR?",
                ":WAV:PRE?",
                ":WAV:DATA?",
            ]
        );
    }

    #[test]
    fn test_read_waveform_data_bad_sample() {
        let mut fake = FakeScope::new();
        fake.reply(":WAV:PRE?", "0,0,3,1,0.001")
            .reply(":WAV:DATA?", "#,1.0,two,3.0,!");
        let mut scope = ScopeClient::from_channel(fake);

        assert!(matches!(
            scope.read_waveform_data(),
            Err(ScopeError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_setup_fault_skips_data_query() {
        let mut fake = FakeScope::new();
        fake.reply(":SYST:ERR?", "0,No error")
            .reply(":SYST:ERR?", "-221,\"Settings conflict\"");
        let mut scope = ScopeClient::from_channel(fake);

        assert!(matches!(
            scope.read_waveform_data(),
            Err(ScopeError::InstrumentFault { code: -221, .. })
        ));
        assert_eq!(
            scope.channel().commands_without_error_checks(),
            [":WAV:SOUR CHAN1", ":WAV:MODE NORM"]
        );
    }

    #[test]
    fn test_configured_capture_has_parallel_series() {
        let samples: Vec<String> = (0..250).map(|i| format!("{:.3}", (i as f64).sin())).collect();
        let data = format!("#9000002000{},{}", samples.join(","), "");

        let mut fake = FakeScope::new();
        fake.reply(":CHAN1:SCAL?", "1.0")
            .reply(":WAV:PRE?", "0,0,249,1,2e-06,0,0,0.04,0,122,0,0")
            .reply(":WAV:DATA?", &data);
        let mut scope = ScopeClient::from_channel(fake);

        scope.set_timebase(0.0005).unwrap();
        scope.set_rising_edge_trigger(0.5).unwrap();
        scope.set_single_shot().unwrap();
        let waveform = scope.read_waveform_data().unwrap();

        assert_eq!(waveform.time.len(), waveform.voltage.len());
        assert_eq!(waveform.len(), 249);
        assert!(waveform.time.windows(2).all(|w| w[1] > w[0]));
    }
}
