//! Audio playback module using cpal.
//!
//! Plays the finished audiobook through the default output device.
//! Includes automatic resampling when the device sample rate differs from the
//! model rate, and uses a lock-free ring buffer to keep the audio callback
//! free of mutex contention. An audiobook is usually far longer than the ring
//! buffer, so the producer side feeds it in slices as the callback drains it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex as StdMutex};
use std::time::Duration;

use anyhow::{Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Stream, StreamConfig};
use parking_lot::Mutex;
use ringbuf::HeapRb;
use ringbuf::traits::{Consumer, Observer, Producer, Split};
use tracing::{debug, info, warn};

use super::resampler::resample;
use super::util::{find_best_config, get_device_name};

/// Size of the playback ring buffer in samples (~11 seconds at 48kHz).
const PLAYBACK_RING_SIZE: usize = 524288;

/// How long the producer sleeps when the ring buffer is full.
const FEED_INTERVAL: Duration = Duration::from_millis(10);

/// Audio player that outputs samples to the speaker.
///
/// The cpal callback pops from a lock-free ring buffer; `play` pushes the
/// waveform into the ring in slices and blocks until the buffer has drained.
pub struct Player {
    /// Kept alive to maintain the audio stream
    _stream: Stream,
    /// Sample rate of the audio device
    device_sample_rate: u32,
    /// Sample rate of the input audio (the model rate)
    input_sample_rate: u32,
    /// Ring buffer producer for queuing samples
    producer: Mutex<ringbuf::HeapProd<f32>>,
    /// Set once `play` has pushed the final sample; the callback only
    /// declares playback finished after this point
    feeding_done: Arc<AtomicBool>,
    /// Flag to indicate playback is active
    playing: Arc<AtomicBool>,
    /// Mutex and Condvar for efficient waiting on playback completion
    playing_mutex: Arc<StdMutex<()>>,
    playback_complete: Arc<Condvar>,
}

impl Player {
    /// Create a new audio player.
    ///
    /// # Arguments
    /// * `sample_rate` - The sample rate of the audio to play (16000 for MMS)
    ///
    /// # Errors
    /// Returns an error if:
    /// - No output device is available
    /// - Failed to get supported output configurations
    /// - Failed to build output stream
    pub fn new(sample_rate: u32) -> Result<Self> {
        let host = cpal::default_host();
        let device = host.default_output_device().context("No output device available")?;

        info!("Using output device: {}", get_device_name(&device));

        // Query device's preferred sample rate for better compatibility
        let device_sample_rate = match device.default_output_config() {
            Ok(default_config) => {
                let rate = default_config.sample_rate();
                debug!("Using device's default sample rate: {} Hz", rate);
                rate
            }
            Err(_) => {
                let supported_configs = device.supported_output_configs().context("Failed to get supported output configs")?;
                let config = find_best_config(supported_configs, 48000)?;
                let rate = config.sample_rate();
                debug!("Using fallback sample rate: {} Hz", rate);
                rate
            }
        };

        let supported_configs = device.supported_output_configs().context("Failed to get supported output configs")?;
        let config = find_best_config(supported_configs, device_sample_rate)?;

        if device_sample_rate != sample_rate {
            info!("Device sample rate {} Hz differs from input {} Hz - resampling will be applied", device_sample_rate, sample_rate);
        }

        debug!("Audio playback config: {} Hz, {} channels, {:?}", device_sample_rate, config.channels(), config.sample_format());

        // Create lock-free ring buffer for the audio callback
        let ring = HeapRb::<f32>::new(PLAYBACK_RING_SIZE);
        let (producer, mut consumer) = ring.split();

        let feeding_done = Arc::new(AtomicBool::new(false));
        let playing = Arc::new(AtomicBool::new(false));
        let playing_mutex = Arc::new(StdMutex::new(()));
        let playback_complete = Arc::new(Condvar::new());

        let feeding_done_clone = feeding_done.clone();
        let playing_clone = playing.clone();
        let playing_mutex_clone = playing_mutex.clone();
        let playback_complete_clone = playback_complete.clone();

        let channels = config.channels() as usize;
        let stream_config: StreamConfig = config.config();

        let err_fn = |err| {
            tracing::error!("Audio playback error: {}", err);
        };

        // Build F32 output stream with lock-free callback
        let stream = device.build_output_stream(
            &stream_config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                for frame in data.chunks_mut(channels) {
                    // Lock-free pop; silence once the buffer runs dry
                    let sample = consumer.try_pop().unwrap_or(0.0);

                    // Duplicate mono sample to all channels
                    for channel in frame.iter_mut() {
                        *channel = sample;
                    }
                }

                // Playback is finished only when the producer has pushed the
                // last sample AND the ring has drained; an empty ring during
                // feeding just means the producer is behind
                if feeding_done_clone.load(Ordering::Relaxed) && consumer.is_empty() && playing_clone.load(Ordering::Relaxed) {
                    playing_clone.store(false, Ordering::SeqCst);
                    let _guard = playing_mutex_clone.lock().unwrap();
                    playback_complete_clone.notify_all();
                }
            },
            err_fn,
            None,
        )?;

        stream.play().context("Failed to start playback stream")?;

        debug!("Audio playback configured: input {} Hz -> device {} Hz (lock-free)", sample_rate, device_sample_rate);

        Ok(Self {
            _stream: stream,
            device_sample_rate,
            input_sample_rate: sample_rate,
            producer: Mutex::new(producer),
            feeding_done,
            playing,
            playing_mutex,
            playback_complete,
        })
    }

    /// Play audio samples, blocking until the whole waveform has been heard.
    ///
    /// # Arguments
    /// * `samples` - The audio samples to play (mono f32 at the input rate)
    pub fn play(&self, samples: &[f32]) -> Result<()> {
        if samples.is_empty() {
            return Ok(());
        }

        // Resample if needed
        let samples_to_play = if self.device_sample_rate != self.input_sample_rate {
            let resampled = resample(samples, self.input_sample_rate, self.device_sample_rate)?;
            debug!(
                "Resampled {} -> {} samples ({} Hz -> {} Hz)",
                samples.len(),
                resampled.len(),
                self.input_sample_rate,
                self.device_sample_rate
            );
            resampled
        } else {
            samples.to_vec()
        };

        let duration_secs = samples_to_play.len() as f64 / self.device_sample_rate as f64;
        info!("Playing {:.1}s of audio at {} Hz", duration_secs, self.device_sample_rate);

        self.feeding_done.store(false, Ordering::SeqCst);
        self.playing.store(true, Ordering::SeqCst);

        // Feed the ring buffer in slices: the audiobook usually exceeds the
        // ring capacity, so wait for the callback to drain it as we go
        let deadline = std::time::Instant::now() + Duration::from_secs_f64(duration_secs + 5.0);
        let mut offset = 0;
        while offset < samples_to_play.len() {
            {
                let mut producer = self.producer.lock();
                offset += producer.push_slice(&samples_to_play[offset..]);
            }

            if offset < samples_to_play.len() {
                if std::time::Instant::now() > deadline {
                    warn!("Playback stalled, aborting");
                    anyhow::bail!("playback stalled before all samples were queued");
                }
                std::thread::sleep(FEED_INTERVAL);
            }
        }

        self.feeding_done.store(true, Ordering::SeqCst);

        // Wait on the condition variable until the callback reports the ring
        // drained (with a deadline in case the device goes away)
        while self.playing.load(Ordering::Relaxed) {
            if std::time::Instant::now() > deadline {
                warn!("Playback timeout exceeded");
                self.playing.store(false, Ordering::SeqCst);
                break;
            }

            let guard = self.playing_mutex.lock().unwrap();
            let (_guard, _timeout_result) = self.playback_complete.wait_timeout(guard, Duration::from_millis(50)).unwrap();
        }

        debug!("Playback completed");
        Ok(())
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.playing.store(false, Ordering::SeqCst);
    }
}
