use imgproc::lowlevel::{luminance, rgb, set_luminance, set_rgb};
use imgproc::{
    Allocation, DecodedImage, ImageCodec, ImgProcError, ImgProcResult, PixelBuffer, JPEG_QUALITY,
};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

/// In-memory codec that records every encode call.
struct MemoryCodec {
    decoded: ImgProcResult<DecodedImage>,
    calls: RefCell<Vec<String>>,
}

impl MemoryCodec {
    fn new(decoded: ImgProcResult<DecodedImage>) -> Self {
        Self {
            decoded,
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl ImageCodec for MemoryCodec {
    fn decode(&self, _path: &Path) -> ImgProcResult<DecodedImage> {
        self.decoded.clone()
    }

    fn encode_jpeg(
        &self,
        pixels: &[u8],
        width: usize,
        height: usize,
        channels: usize,
        quality: u8,
    ) -> ImgProcResult<Vec<u8>> {
        self.calls
            .borrow_mut()
            .push(format!("jpeg {width}x{height}x{channels} q{quality}"));
        Ok(pixels.to_vec())
    }

    fn encode_png(
        &self,
        pixels: &[u8],
        width: usize,
        height: usize,
        channels: usize,
        stride: usize,
    ) -> ImgProcResult<Vec<u8>> {
        self.calls
            .borrow_mut()
            .push(format!("png {width}x{height}x{channels} stride{stride}"));
        Ok(pixels.to_vec())
    }
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("imgproc-core-{}-{name}", std::process::id()))
}

fn rgb_decoded() -> DecodedImage {
    DecodedImage {
        data: (0u8..12).collect(),
        width: 2,
        height: 2,
        channels: 3,
    }
}

#[test]
fn create_zeroed_then_release_never_double_frees() {
    for (w, h, c) in [(1, 1, 1), (3, 2, 3), (7, 5, 4)] {
        let mut buf = PixelBuffer::create(w, h, c, true).unwrap();
        assert_eq!(buf.data().unwrap().len(), w * h * c);
        assert!(buf.data().unwrap().iter().all(|&b| b == 0));
        buf.release();
        buf.release();
        assert_eq!(buf.allocation(), Allocation::None);
        assert_eq!(buf.data().unwrap_err(), ImgProcError::EmptyBuffer);
    }
}

#[test]
fn load_tags_codec_allocation() {
    let codec = MemoryCodec::new(Ok(rgb_decoded()));
    let mut buf = PixelBuffer::load(&codec, "in.png").unwrap();
    assert_eq!(buf.allocation(), Allocation::CodecAllocated);
    assert_eq!((buf.width(), buf.height(), buf.channels()), (2, 2, 3));
    assert_eq!(rgb(&buf, 1, 1).unwrap(), [9, 10, 11]);
    buf.release();
    assert!(buf.is_empty());
}

#[test]
fn load_propagates_codec_failure() {
    let codec = MemoryCodec::new(Err(ImgProcError::ImageIo {
        reason: "unrecognized format".to_string(),
    }));
    let err = PixelBuffer::load(&codec, "broken.bin").unwrap_err();
    assert!(matches!(err, ImgProcError::ImageIo { .. }));
}

#[test]
fn load_rejects_inconsistent_codec_output() {
    let mut decoded = rgb_decoded();
    decoded.data.pop();
    let codec = MemoryCodec::new(Ok(decoded));
    let err = PixelBuffer::load(&codec, "short.png").unwrap_err();
    assert_eq!(err, ImgProcError::BufferSizeMismatch { needed: 12, got: 11 });
}

#[test]
fn save_dispatches_on_extension() {
    let codec = MemoryCodec::new(Ok(rgb_decoded()));
    let buf = PixelBuffer::from_raw((0u8..24).collect(), 3, 2, 4).unwrap();

    let jpg = temp_path("out.JPEG");
    let png = temp_path("out.png");
    buf.save(&codec, &jpg).unwrap();
    buf.save(&codec, &png).unwrap();

    assert_eq!(
        codec.calls.borrow().as_slice(),
        &[
            format!("jpeg 3x2x4 q{JPEG_QUALITY}"),
            "png 3x2x4 stride12".to_string(),
        ]
    );
    assert_eq!(fs::read(&png).unwrap(), buf.data().unwrap());

    fs::remove_file(jpg).unwrap();
    fs::remove_file(png).unwrap();
}

#[test]
fn save_rejects_unknown_extension_without_writing() {
    let codec = MemoryCodec::new(Ok(rgb_decoded()));
    let buf = PixelBuffer::create(2, 2, 3, true).unwrap();
    let path = temp_path("out.tiff");
    let err = buf.save(&codec, &path).unwrap_err();
    assert!(matches!(err, ImgProcError::UnsupportedExtension { .. }));
    assert!(codec.calls.borrow().is_empty());
    assert!(!path.exists());
}

#[test]
fn saving_a_released_buffer_fails() {
    let codec = MemoryCodec::new(Ok(rgb_decoded()));
    let mut buf = PixelBuffer::create(2, 2, 3, true).unwrap();
    buf.release();
    let err = buf.save(&codec, temp_path("released.png")).unwrap_err();
    assert_eq!(err, ImgProcError::EmptyBuffer);
}

#[test]
fn luminance_reads_back_truncated_write() {
    let mut buf = PixelBuffer::create(3, 3, 3, true).unwrap();
    for (i, v) in [0.0, 17.9, 63.5, 128.25, 200.999, 255.0].iter().enumerate() {
        set_luminance(&mut buf, i % 3, i / 3, *v).unwrap();
        let t = v.trunc();
        let expected = (0.299 * t + 0.587 * t + 0.144 * t) as i32;
        assert_eq!(luminance(&buf, i % 3, i / 3).unwrap(), expected);
        assert_eq!(rgb(&buf, i % 3, i / 3).unwrap(), [t as u8; 3]);
    }
}

#[test]
fn rgb_writes_are_independent() {
    let mut buf = PixelBuffer::create(2, 1, 3, true).unwrap();
    set_rgb(&mut buf, 1, 0, 10.9, 20.1, 30.5).unwrap();
    assert_eq!(buf.data().unwrap(), &[0, 0, 0, 10, 20, 30]);
}
