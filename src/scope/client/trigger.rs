use super::ScopeClient;
use crate::error::ScopeError;
use crate::scope::channel::ByteChannel;
use crate::scope::protocol;
use log::debug;

impl<C: ByteChannel> ScopeClient<C> {
    /// Trigger on a rising edge of channel 1 at `trigger_level` volts.
    ///
    /// The level must lie within the current vertical limits; the scope's I/O
    /// locks up when the trigger is set off screen. Mode, level, source and
    /// slope are sent as four separately checked commands. A fault stops the
    /// sequence and leaves the earlier commands applied.
    pub fn set_rising_edge_trigger(&mut self, trigger_level: f64) -> Result<(), ScopeError> {
        let limits = self.vertical_limits()?;
        if !limits.contains(trigger_level) {
            return Err(ScopeError::Validation(format!(
                "Trigger outside limits. The vertical limits are {}V and +{}V",
                limits.min, limits.max
            )));
        }

        self.execute_checked(protocol::TRIG_MODE_EDGE)?;

        debug!("Setting trigger level to {trigger_level} volts");
        self.execute_checked(&protocol::set_command(
            protocol::TRIG_EDGE_LEVEL,
            trigger_level,
        ))?;

        self.execute_checked(protocol::TRIG_EDGE_SOURCE_CHAN1)?;
        self.execute_checked(protocol::TRIG_EDGE_SLOPE_POS)
    }

    /// Arm a single-shot acquisition.
    pub fn set_single_shot(&mut self) -> Result<(), ScopeError> {
        debug!("Setting scope to single trigger mode");
        self.execute_checked(protocol::SINGLE)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ScopeError;
    use crate::scope::mock::FakeScope;
    use crate::ScopeClient;

    fn scope_with_scale(volts_per_div: &str) -> ScopeClient<FakeScope> {
        let mut fake = FakeScope::new();
        fake.reply(":CHAN1:SCAL?", volts_per_div);
        ScopeClient::from_channel(fake)
    }

    #[test]
    fn test_trigger_outside_vertical_limits() {
        let mut scope = scope_with_scale("1.0");
        assert!(matches!(
            scope.set_rising_edge_trigger(5.0),
            Err(ScopeError::Validation(_))
        ));
        assert_eq!(
            scope.channel().commands_without_error_checks(),
            [":CHAN1:SCAL?"]
        );
    }

    #[test]
    fn test_trigger_sequence() {
        let mut scope = scope_with_scale("1.0");
        scope.set_rising_edge_trigger(4.0).unwrap();

        assert_eq!(
            scope.channel().commands(),
            [
                ":CHAN1:SCAL?",
                ":SYST:ERR?",
                ":TRIG:MODE EDGE",
                ":SYST:ERR?",
                ":TRIG:EDG:LEV 4",
                ":SYST:ERR?",
                ":TRIG:EDG:SOUR CHAN1",
                ":SYST:ERR?",
                ":TRIG:EDG:SLOP POS",
                ":SYST:ERR?",
            ]
        );
    }

    #[test]
    fn test_trigger_fault_stops_sequence() {
        let mut fake = FakeScope::new();
        fake.reply(":CHAN1:SCAL?", "1.0")
            .reply(":SYST:ERR?", "0,No error")
            .reply(":SYST:ERR?", "0,No error")
            .reply(":SYST:ERR?", "-222,\"Data out of range\"");
        let mut scope = ScopeClient::from_channel(fake);

        assert!(matches!(
            scope.set_rising_edge_trigger(-1.0),
            Err(ScopeError::InstrumentFault { code: -222, .. })
        ));
        assert_eq!(
            scope.channel().commands_without_error_checks(),
            [":CHAN1:SCAL?", ":TRIG:MODE EDGE", ":TRIG:EDG:LEV -1"]
        );
    }

    #[test]
    fn test_single_shot() {
        let mut scope = ScopeClient::from_channel(FakeScope::new());
        scope.set_single_shot().unwrap();
        assert_eq!(scope.channel().commands(), [":SING", ":SYST:ERR?"]);
    }
}
