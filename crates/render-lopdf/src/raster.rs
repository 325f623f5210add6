use folio_types::ResourceKey;
use image::{ColorType, GenericImageView};
use lopdf::{dictionary, Stream};

/// A raster image prepared as a PDF image XObject.
///
/// Pixels are decoded once at construction and stored uncompressed as
/// DeviceRGB (or DeviceGray for grayscale sources). An alpha channel becomes
/// a separate soft mask stream.
#[derive(Debug, Clone)]
pub struct Image {
    key: ResourceKey,
    width: u32,
    height: u32,
    xobject: Stream,
    soft_mask: Option<Stream>,
}

impl Image {
    pub fn decode(key: ResourceKey, bytes: &[u8]) -> Result<Self, image::ImageError> {
        let decoded = image::load_from_memory(bytes)?;
        let (width, height) = decoded.dimensions();
        let color = decoded.color();

        let grayscale = matches!(
            color,
            ColorType::L8 | ColorType::L16 | ColorType::La8 | ColorType::La16
        );
        let (color_space, pixels) = if grayscale {
            ("DeviceGray", decoded.to_luma8().into_raw())
        } else {
            ("DeviceRGB", decoded.to_rgb8().into_raw())
        };

        let soft_mask = color.has_alpha().then(|| {
            let alpha: Vec<u8> = decoded.to_rgba8().pixels().map(|p| p.0[3]).collect();
            Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => width as i64,
                    "Height" => height as i64,
                    "ColorSpace" => "DeviceGray",
                    "BitsPerComponent" => 8,
                },
                alpha,
            )
        });

        let xobject = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width as i64,
                "Height" => height as i64,
                "ColorSpace" => color_space,
                "BitsPerComponent" => 8,
            },
            pixels,
        );

        Ok(Self {
            key,
            width,
            height,
            xobject,
            soft_mask,
        })
    }

    pub fn key(&self) -> &ResourceKey {
        &self.key
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The image XObject. When a soft mask exists, the caller adds it to the
    /// document and sets `/SMask` on a copy of this stream.
    pub fn xobject(&self) -> &Stream {
        &self.xobject
    }

    pub fn soft_mask(&self) -> Option<&Stream> {
        self.soft_mask.as_ref()
    }
}
