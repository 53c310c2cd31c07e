use std::io::{self, Read};

const IMAGES_MAGIC: u32 = 0x0000_0803;
const LABELS_MAGIC: u32 = 0x0000_0801;

#[derive(Debug, thiserror::Error)]
pub enum MnistError {
    #[error("invalid magic number in {stream} stream: expected {expected:#010x}, found {found:#010x}")]
    InvalidMagic {
        stream: &'static str,
        expected: u32,
        found: u32,
    },
    #[error("number of images ({images}) doesn't match number of labels ({labels})")]
    CountMismatch { images: u32, labels: u32 },
    #[error("requested {requested} records but the dataset holds only {available}")]
    RangeExceeded { requested: usize, available: usize },
    #[error("buffer size overflows for {requested} images of {width}x{height}")]
    BufferOverflow {
        requested: usize,
        width: usize,
        height: usize,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Sequential reader for the MNIST IDX pair of image and label streams.
///
/// Both headers are read and validated up front; construction either
/// yields a fully usable reader or fails with [`MnistError`], never a
/// partial object. Record extraction is sequential: each `load_*` call
/// consumes the next `n` records from its stream.
#[derive(Debug)]
pub struct Mnist<R> {
    images: R,
    labels: R,
    num_items: u32,
    width: u32,
    height: u32,
}

impl<R: Read> Mnist<R> {
    pub fn new(mut images: R, mut labels: R) -> Result<Self, MnistError> {
        let magic = read_be_u32(&mut images)?;
        if magic != IMAGES_MAGIC {
            return Err(MnistError::InvalidMagic {
                stream: "images",
                expected: IMAGES_MAGIC,
                found: magic,
            });
        }
        let num_items = read_be_u32(&mut images)?;
        let height = read_be_u32(&mut images)?;
        let width = read_be_u32(&mut images)?;

        let magic = read_be_u32(&mut labels)?;
        if magic != LABELS_MAGIC {
            return Err(MnistError::InvalidMagic {
                stream: "labels",
                expected: LABELS_MAGIC,
                found: magic,
            });
        }
        let num_labels = read_be_u32(&mut labels)?;
        if num_labels != num_items {
            return Err(MnistError::CountMismatch {
                images: num_items,
                labels: num_labels,
            });
        }

        Ok(Self {
            images,
            labels,
            num_items,
            width,
            height,
        })
    }

    /// Next `num_images` images as one contiguous row-major byte buffer.
    pub fn load_images(&mut self, num_images: usize) -> Result<Vec<u8>, MnistError> {
        if num_images > self.num_items as usize {
            return Err(MnistError::RangeExceeded {
                requested: num_images,
                available: self.num_items as usize,
            });
        }
        // Header dimensions are untrusted; never let the buffer size wrap.
        let buffer_size = (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|pixels| pixels.checked_mul(num_images))
            .ok_or(MnistError::BufferOverflow {
                requested: num_images,
                width: self.width as usize,
                height: self.height as usize,
            })?;
        let mut buffer = vec![0u8; buffer_size];
        self.images.read_exact(&mut buffer)?;
        Ok(buffer)
    }

    /// Next `num_labels` labels, one byte each.
    pub fn load_labels(&mut self, num_labels: usize) -> Result<Vec<u8>, MnistError> {
        if num_labels > self.num_items as usize {
            return Err(MnistError::RangeExceeded {
                requested: num_labels,
                available: self.num_items as usize,
            });
        }
        let mut buffer = vec![0u8; num_labels];
        self.labels.read_exact(&mut buffer)?;
        Ok(buffer)
    }

    pub fn size(&self) -> usize {
        self.num_items as usize
    }

    pub fn image_width(&self) -> usize {
        self.width as usize
    }

    pub fn image_height(&self) -> usize {
        self.height as usize
    }
}

fn read_be_u32(reader: &mut impl Read) -> io::Result<u32> {
    let mut buffer = [0u8; 4];
    reader.read_exact(&mut buffer)?;
    Ok(u32::from_be_bytes(buffer))
}
