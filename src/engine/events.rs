//! Engine Events
//!
//! Messages sent from the audio callback to the UI thread.
//! All types here must be Send + 'static for safe cross-thread communication.

/// Events sent from the audio engine to the UI thread.
/// These provide feedback for metering and status display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineEvent {
    /// The device has started pulling samples.
    Started {
        /// Device sample rate in Hz.
        sample_rate: u32,
    },

    /// Peak level of the block just delivered to the device.
    OutputLevel {
        /// Absolute peak, 0.0-1.0.
        peak: f32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_debug() {
        let event = EngineEvent::Started { sample_rate: 48000 };
        assert!(format!("{:?}", event).contains("Started"));
    }

    #[test]
    fn test_event_copy() {
        let event = EngineEvent::OutputLevel { peak: 0.5 };
        let copied = event;
        if let EngineEvent::OutputLevel { peak } = copied {
            assert!((peak - 0.5).abs() < f32::EPSILON);
        } else {
            panic!("Copy failed");
        }
    }

    #[test]
    fn test_event_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<EngineEvent>();
    }
}
