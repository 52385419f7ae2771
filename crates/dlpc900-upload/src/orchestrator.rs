//! Orchestrates an upload end to end: LUT definition, bitmap streaming, and
//! starting the sequence.
//!
//! The sequencing mirrors the reference driver's `upload_on_the_fly` /
//! `set_pre_stored_sequence`: stop whatever is running, switch display
//! mode, define the LUT, configure it, stream bitmaps (combined images are
//! uploaded in reverse order, and split across both controllers on
//! dual-controller panels), configure the LUT a second time now that image
//! memory is populated, then start (or, for triggered sequences, arm and
//! immediately stop, since the controller itself advances the sequence on
//! each trigger pulse). The reference driver issues a second defensive stop
//! between the mode switch and the LUT definition loop; this driver's
//! state machine already guarantees `lut_define` cannot run except from a
//! freshly-entered mode, so that redundant stop has no counterpart here.

use dlpc900_codec::{BinaryPattern, RgbImage, combine, erle, rle, split_columns};
use dlpc900_core::{Clock, DisplayMode, SystemClock};
use dlpc900_lut::{LutController, PatternLutConfig};
use dlpc900_proto::{BitmapHeader, CompressionMode, LED_SELECT_DISABLED, LutEntry, MAX_COMMAND_PAYLOAD, Opcode, PanelProfile};
use dlpc900_transport::HidTransport;
use tracing::info;

use crate::{
    error::UploadError,
    index::index_to_pic_bit,
    request::{PatternUploadRequest, PreStoredSequenceRequest},
};

/// Drives a [`LutController`] through a full pattern-sequence upload.
pub struct UploadOrchestrator<T: HidTransport, C: Clock = SystemClock> {
    controller: LutController<T, C>,
}

impl<T: HidTransport, C: Clock> UploadOrchestrator<T, C> {
    /// Wrap a [`LutController`].
    pub fn new(controller: LutController<T, C>) -> Self {
        Self { controller }
    }

    /// Borrow the underlying [`LutController`], e.g. to check sequencer
    /// state after an upload.
    pub fn controller(&mut self) -> &mut LutController<T, C> {
        &mut self.controller
    }

    /// Upload `request.patterns` and run them as an on-the-fly pattern
    /// sequence.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::EmptyRequest`] if no patterns were supplied,
    /// or an LUT/codec error if any step fails.
    pub fn upload_on_the_fly(&mut self, request: &PatternUploadRequest) -> Result<(), UploadError> {
        let (exposures_us, dark_us) = request.validate()?;

        self.controller.stop()?;
        self.controller.enter_pattern_mode()?;

        let entries = build_lut_entries(&exposures_us, &dark_us, request.triggered);
        self.controller.lut_define(&entries)?;
        self.controller.lut_configure(PatternLutConfig {
            num_luts: entries.len() as u16,
            num_repeats: request.num_repeats,
        })?;

        let images = combine(&request.patterns)?;
        info!(images = images.len(), panel = ?request.panel, "uploading combined pattern images");
        for (pic_index, image) in images.iter().enumerate().rev() {
            self.upload_image(pic_index, image, request.panel, request.compression)?;
        }

        self.controller.lut_configure(PatternLutConfig {
            num_luts: entries.len() as u16,
            num_repeats: request.num_repeats,
        })?;

        self.controller.start()?;
        if request.triggered {
            self.controller.stop()?;
        }
        Ok(())
    }

    /// Run a sequence already stored in the controller's flash, without
    /// uploading any new bitmaps.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::EmptyRequest`] if no stored indices were
    /// supplied, or an LUT error if any step fails.
    pub fn set_pre_stored_sequence(
        &mut self,
        request: &PreStoredSequenceRequest,
    ) -> Result<(), UploadError> {
        let (exposures_us, dark_us) = request.validate()?;

        self.controller.stop()?;
        self.controller.enter_mode(DisplayMode::PreStoredPatternSequence)?;

        let entries: Vec<LutEntry> = request
            .stored_indices
            .iter()
            .enumerate()
            .map(|(position, &(pic, bit))| LutEntry {
                sequence_position: position as u16,
                exposure_us: exposures_us[position],
                clear_after_trigger: false,
                bit_depth: 0,
                led_select: LED_SELECT_DISABLED,
                wait_for_trigger: request.triggered,
                dark_time_us: dark_us[position],
                disable_trig2: false,
                stored_image_index: pic,
                stored_image_bit_index: bit,
            })
            .collect();

        self.controller.lut_define(&entries)?;
        self.controller.lut_configure(PatternLutConfig {
            num_luts: entries.len() as u16,
            num_repeats: request.num_repeats,
        })?;

        self.controller.start()?;
        if request.triggered {
            self.controller.stop()?;
        }
        Ok(())
    }

    fn upload_image(
        &mut self,
        pic_index: usize,
        image: &RgbImage,
        panel: PanelProfile,
        compression: CompressionMode,
    ) -> Result<(), UploadError> {
        if panel.dual_controller() {
            let (primary, secondary) = split_columns(image);
            self.stream_bitmap(
                pic_index,
                Opcode::PatmemLoadInitMaster,
                Opcode::PatmemLoadDataMaster,
                &primary,
                compression,
            )?;
            self.stream_bitmap(
                pic_index,
                Opcode::PatmemLoadInitSecondary,
                Opcode::PatmemLoadDataSecondary,
                &secondary,
                compression,
            )?;
        } else {
            self.stream_bitmap(
                pic_index,
                Opcode::PatmemLoadInitMaster,
                Opcode::PatmemLoadDataMaster,
                image,
                compression,
            )?;
        }
        info!(pic_index, "uploaded combined image");
        Ok(())
    }

    fn stream_bitmap(
        &mut self,
        pic_index: usize,
        init_opcode: Opcode,
        data_opcode: Opcode,
        image: &RgbImage,
        compression: CompressionMode,
    ) -> Result<(), UploadError> {
        let encoded = match compression {
            CompressionMode::None => uncompressed(image),
            CompressionMode::Rle => rle::encode(image)?,
            CompressionMode::Erle => erle::encode(image)?,
        };

        let header = BitmapHeader {
            width: image.width as u16,
            height: image.height as u16,
            num_encoded_bytes: encoded.len() as u32,
            compression,
        };

        let mut stream = header.encode().to_vec();
        stream.extend_from_slice(&encoded);

        let mut init_payload = (pic_index as u16).to_le_bytes().to_vec();
        init_payload.extend_from_slice(&(stream.len() as u32).to_le_bytes());
        self.controller.driver().write(init_opcode, init_payload)?;

        for chunk in stream.chunks(MAX_COMMAND_PAYLOAD) {
            let mut data_payload = (chunk.len() as u16).to_le_bytes().to_vec();
            data_payload.extend_from_slice(chunk);
            self.controller.driver().write(data_opcode, data_payload)?;
        }
        Ok(())
    }
}

fn uncompressed(image: &RgbImage) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(image.pixels.len() * 3);
    for px in &image.pixels {
        bytes.extend_from_slice(&[px[2], px[1], px[0]]); // B, G, R
    }
    bytes
}

fn build_lut_entries(exposures_us: &[u32], dark_us: &[u16], triggered: bool) -> Vec<LutEntry> {
    exposures_us
        .iter()
        .zip(dark_us.iter())
        .enumerate()
        .map(|(idx, (&exposure_us, &dark_time_us))| {
            let (pic, bit) = index_to_pic_bit(idx);
            LutEntry {
                sequence_position: idx as u16,
                exposure_us,
                clear_after_trigger: false,
                bit_depth: 0,
                led_select: LED_SELECT_DISABLED,
                wait_for_trigger: triggered,
                dark_time_us,
                disable_trig2: false,
                stored_image_index: pic,
                stored_image_bit_index: bit,
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use dlpc900_core::{Driver, NullClock};
    use dlpc900_lut::SequencerState;
    use dlpc900_proto::Opcode;
    use dlpc900_transport::FakeHid;

    use crate::request::PerPattern;

    use super::*;

    fn test_driver(fake: FakeHid) -> Driver<FakeHid, NullClock> {
        Driver::with_clock(fake, dlpc900_core::DEFAULT_TIMEOUT, NullClock)
    }

    fn pattern(width: usize, height: usize, value: u8) -> BinaryPattern {
        BinaryPattern { width, height, pixels: vec![value; width * height] }
    }

    fn fake_for_single_image_upload() -> FakeHid {
        let mut fake = FakeHid::new();
        fake.queue_response(0x00, 0, &[]); // stop
        fake.queue_response(0x00, 1, &[]); // write display mode
        fake.queue_response(0x00, 2, &[DisplayMode::OnTheFlyPatternSequence.to_u8()]); // read-back
        fake.queue_response(0x00, 3, &[]); // lut_define: entry 0
        fake.queue_response(0x00, 4, &[]); // lut_configure (initial)
        fake.queue_response(0x00, 5, &[]); // patmem init
        fake.queue_response(0x00, 6, &[]); // patmem data
        fake.queue_response(0x00, 7, &[]); // lut_configure (final)
        fake.queue_response(0x00, 8, &[]); // start
        fake
    }

    #[test]
    fn upload_on_the_fly_rejects_empty_pattern_list() {
        let mut orch = UploadOrchestrator::new(LutController::new(test_driver(FakeHid::new())));
        let request = PatternUploadRequest {
            patterns: vec![],
            panel: PanelProfile::Dlp6500,
            compression: CompressionMode::Erle,
            exposures_us: PerPattern::Broadcast(1_000),
            dark_us: PerPattern::Broadcast(0),
            bit_depth: 1,
            num_repeats: 0,
            triggered: false,
        };
        assert!(matches!(orch.upload_on_the_fly(&request), Err(UploadError::EmptyRequest)));
    }

    #[test]
    fn upload_on_the_fly_single_pattern_reaches_running_state() {
        let fake = fake_for_single_image_upload();
        let mut orch = UploadOrchestrator::new(LutController::new(test_driver(fake)));
        let request = PatternUploadRequest {
            patterns: vec![pattern(4, 4, 1)],
            panel: PanelProfile::Dlp6500,
            compression: CompressionMode::Erle,
            exposures_us: PerPattern::Broadcast(1_000),
            dark_us: PerPattern::Broadcast(0),
            bit_depth: 1,
            num_repeats: 0,
            triggered: false,
        };
        orch.upload_on_the_fly(&request).unwrap();
        assert_eq!(orch.controller().state(), SequencerState::Running);
    }

    #[test]
    fn upload_on_the_fly_sends_patmem_init_before_data() {
        let fake = fake_for_single_image_upload();
        let mut orch = UploadOrchestrator::new(LutController::new(test_driver(fake)));
        let request = PatternUploadRequest {
            patterns: vec![pattern(4, 4, 0)],
            panel: PanelProfile::Dlp6500,
            compression: CompressionMode::Erle,
            exposures_us: PerPattern::Broadcast(1_000),
            dark_us: PerPattern::Broadcast(0),
            bit_depth: 1,
            num_repeats: 0,
            triggered: false,
        };
        orch.upload_on_the_fly(&request).unwrap();
        let log = orch.controller().driver().transport().command_log().to_vec();
        let init_pos = log.iter().position(|c| c.opcode == Opcode::PatmemLoadInitMaster).unwrap();
        let data_pos = log.iter().position(|c| c.opcode == Opcode::PatmemLoadDataMaster).unwrap();
        assert!(init_pos < data_pos);
    }

    #[test]
    fn patmem_init_payload_carries_image_index_and_length() {
        let fake = fake_for_single_image_upload();
        let mut orch = UploadOrchestrator::new(LutController::new(test_driver(fake)));
        let request = PatternUploadRequest {
            patterns: vec![pattern(4, 4, 0)],
            panel: PanelProfile::Dlp6500,
            compression: CompressionMode::Erle,
            exposures_us: PerPattern::Broadcast(1_000),
            dark_us: PerPattern::Broadcast(0),
            bit_depth: 1,
            num_repeats: 0,
            triggered: false,
        };
        orch.upload_on_the_fly(&request).unwrap();
        let log = orch.controller().driver().transport().command_log().to_vec();
        let init = log.iter().find(|c| c.opcode == Opcode::PatmemLoadInitMaster).unwrap();
        assert_eq!(init.payload.len(), 6);
        assert_eq!(&init.payload[0..2], &0u16.to_le_bytes());
        let expected_len = u32::from_le_bytes(init.payload[2..6].try_into().unwrap());

        let data = log.iter().find(|c| c.opcode == Opcode::PatmemLoadDataMaster).unwrap();
        let chunk_len = u16::from_le_bytes(data.payload[0..2].try_into().unwrap());
        assert_eq!(chunk_len as usize, data.payload.len() - 2);
        assert_eq!(chunk_len as u32, expected_len);
    }

    #[test]
    fn triggered_upload_stops_immediately_after_starting() {
        let mut fake = fake_for_single_image_upload();
        fake.queue_response(0x00, 9, &[]); // trailing stop
        let mut orch = UploadOrchestrator::new(LutController::new(test_driver(fake)));
        let request = PatternUploadRequest {
            patterns: vec![pattern(2, 2, 1)],
            panel: PanelProfile::Dlp6500,
            compression: CompressionMode::Rle,
            exposures_us: PerPattern::Broadcast(500),
            dark_us: PerPattern::Broadcast(0),
            bit_depth: 1,
            num_repeats: 0,
            triggered: true,
        };
        orch.upload_on_the_fly(&request).unwrap();
        assert_eq!(orch.controller().state(), SequencerState::Stopped);
    }
}
