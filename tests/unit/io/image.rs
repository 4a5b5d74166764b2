//! Tests for PPM decoding, its failure modes and preview conversion

#[cfg(test)]
mod tests {
    use ndarray::array;
    use std::path::Path;
    use tempfile::TempDir;
    use texgram::SynthesisError;
    use texgram::io::image::{
        CHANNELS, bitboard_to_image, export_preview, read_rgb_image, recurrence_map_to_image,
    };

    fn write_file(directory: &TempDir, name: &str, contents: &[u8]) -> std::path::PathBuf {
        let path = directory.path().join(name);
        std::fs::write(&path, contents).expect("failed to write test file");
        path
    }

    fn ppm(header: &str, samples: &[u8]) -> Vec<u8> {
        let mut contents = header.as_bytes().to_vec();
        contents.extend_from_slice(samples);
        contents
    }

    // Tests a binary RGB image decodes into (row, col, channel) order
    // Verified by reading samples column-major
    #[test]
    fn test_read_rgb_image() {
        let directory = TempDir::new().expect("failed to create temp dir");
        let samples: Vec<u8> = (0..18).collect();
        let path = write_file(&directory, "a.ppm", &ppm("P6\n3 2\n255\n", &samples));

        let image = read_rgb_image(&path).expect("decode failed");
        assert_eq!(image.dim(), (2, 3, CHANNELS));
        assert_eq!(image.get((0, 0, 0)), Some(&0));
        assert_eq!(image.get((0, 1, 2)), Some(&5));
        assert_eq!(image.get((1, 0, 0)), Some(&9));
        assert_eq!(image.get((1, 2, 2)), Some(&17));
    }

    // Tests a comment in the header is tolerated
    // Verified by reading the comment as a dimension
    #[test]
    fn test_read_header_comment() {
        let directory = TempDir::new().expect("failed to create temp dir");
        let path = write_file(
            &directory,
            "c.ppm",
            &ppm("P6\n# scanned texture\n1 1\n255\n", &[10, 20, 30]),
        );

        let image = read_rgb_image(&path).expect("decode failed");
        assert_eq!(image.dim(), (1, 1, CHANNELS));
    }

    // Tests a missing file is an input-not-found error
    // Verified by mapping every open failure to a file system error
    #[test]
    fn test_missing_file() {
        let result = read_rgb_image(Path::new("/nonexistent/texture.ppm"));
        assert!(matches!(result, Err(SynthesisError::InputNotFound { .. })));
    }

    // Tests an unparseable header is a malformed header error
    // Verified by deferring header errors to the pixel read
    #[test]
    fn test_malformed_header() {
        let directory = TempDir::new().expect("failed to create temp dir");
        let path = write_file(&directory, "bad.ppm", b"not an image at all");

        let result = read_rgb_image(&path);
        assert!(matches!(
            result,
            Err(SynthesisError::MalformedImageHeader { .. })
        ));
    }

    // Tests grayscale images are rejected as malformed
    // Verified by expanding grayscale to three channels
    #[test]
    fn test_grayscale_rejected() {
        let directory = TempDir::new().expect("failed to create temp dir");
        let path = write_file(&directory, "gray.ppm", &ppm("P5\n2 2\n255\n", &[1, 2, 3, 4]));

        let result = read_rgb_image(&path);
        assert!(matches!(
            result,
            Err(SynthesisError::MalformedImageHeader { .. })
        ));
    }

    // Tests ASCII pixmaps are rejected even when they describe 8-bit RGB
    // Verified by accepting every pixmap encoding
    #[test]
    fn test_ascii_pixmap_rejected() {
        let directory = TempDir::new().expect("failed to create temp dir");
        let path = write_file(
            &directory,
            "ascii.ppm",
            b"P3\n2 1\n255\n10 20 30 40 50 60\n",
        );

        let result = read_rgb_image(&path);
        assert!(matches!(
            result,
            Err(SynthesisError::MalformedImageHeader { .. })
        ));
    }

    // Tests a maximal sample other than 255 is rejected instead of rescaled
    // Verified by letting the decoder rescale samples to 255
    #[test]
    fn test_other_max_sample_rejected() {
        let directory = TempDir::new().expect("failed to create temp dir");
        let path = write_file(
            &directory,
            "dim.ppm",
            &ppm("P6\n2 1\n100\n", &[10, 20, 30, 40, 50, 60]),
        );

        let result = read_rgb_image(&path);
        assert!(matches!(
            result,
            Err(SynthesisError::MalformedImageHeader { .. })
        ));
    }

    // Tests RGB arbitrary maps are rejected
    // Verified by accepting any header that decodes to 8-bit RGB
    #[test]
    fn test_arbitrary_map_rejected() {
        let directory = TempDir::new().expect("failed to create temp dir");
        let header = "P7\nWIDTH 1\nHEIGHT 1\nDEPTH 3\nMAXVAL 255\nTUPLTYPE RGB\nENDHDR\n";
        let path = write_file(&directory, "pam.ppm", &ppm(header, &[1, 2, 3]));

        let result = read_rgb_image(&path);
        assert!(matches!(
            result,
            Err(SynthesisError::MalformedImageHeader { .. })
        ));
    }

    // Tests samples are kept exactly as stored
    // Verified by rescaling samples against the maximal sample
    #[test]
    fn test_samples_not_rescaled() {
        let directory = TempDir::new().expect("failed to create temp dir");
        let path = write_file(
            &directory,
            "raw.ppm",
            &ppm("P6\n2 1\n255\n", &[10, 20, 30, 40, 50, 255]),
        );

        let image = read_rgb_image(&path).expect("decode failed");
        assert_eq!(
            image.iter().copied().collect::<Vec<u8>>(),
            vec![10, 20, 30, 40, 50, 255]
        );
    }

    // Tests short pixel data is a truncation error naming the expected size
    // Verified by zero-padding the missing samples
    #[test]
    fn test_truncated_pixels() {
        let directory = TempDir::new().expect("failed to create temp dir");
        let path = write_file(&directory, "short.ppm", &ppm("P6\n2 2\n255\n", &[1, 2, 3, 4, 5]));

        let result = read_rgb_image(&path);
        assert!(matches!(
            result,
            Err(SynthesisError::PixelReadTruncated {
                expected_bytes: 12,
                ..
            })
        ));
    }

    // Tests a header announcing no pixels is rejected
    // Verified by accepting an empty image
    #[test]
    fn test_empty_image_rejected() {
        let directory = TempDir::new().expect("failed to create temp dir");
        let path = write_file(&directory, "empty.ppm", b"P6\n0 0\n255\n");

        let result = read_rgb_image(&path);
        assert!(matches!(
            result,
            Err(SynthesisError::MalformedImageHeader { .. })
        ));
    }

    // Tests recurrence values map linearly to grey levels
    // Verified by inverting the grey scale
    #[test]
    fn test_recurrence_map_to_image() {
        let map = array![[0.0_f32, 1.0, 0.5], [0.25, 2.0, -1.0]];
        let img = recurrence_map_to_image(&map);

        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(0, 0).0, [0]);
        assert_eq!(img.get_pixel(1, 0).0, [255]);
        assert_eq!(img.get_pixel(2, 0).0, [127]);
        assert_eq!(img.get_pixel(0, 1).0, [63]);
        assert_eq!(img.get_pixel(1, 1).0, [255]);
        assert_eq!(img.get_pixel(2, 1).0, [0]);
    }

    // Tests bitboards render ones as white and zeros as black
    // Verified by rendering ones as level 1
    #[test]
    fn test_bitboard_to_image() {
        let bitboard = array![[1u8, 0], [0, 1], [1, 1]];
        let img = bitboard_to_image(&bitboard);

        assert_eq!(img.dimensions(), (2, 3));
        assert_eq!(img.get_pixel(0, 0).0, [255]);
        assert_eq!(img.get_pixel(1, 0).0, [0]);
        assert_eq!(img.get_pixel(1, 2).0, [255]);
    }

    // Tests previews are written as PNG, creating missing directories
    // Verified by skipping directory creation
    #[test]
    fn test_export_preview() {
        let directory = TempDir::new().expect("failed to create temp dir");
        let path = directory.path().join("nested/preview_bw.png");
        let img = bitboard_to_image(&array![[1u8, 0], [0, 1]]);

        export_preview(&img, &path).expect("export failed");

        let reloaded = image::open(&path).expect("preview unreadable").to_luma8();
        assert_eq!(reloaded, img);
    }

    // Tests an unknown preview extension fails as an export error
    // Verified by defaulting unknown extensions to PNG
    #[test]
    fn test_export_preview_unknown_format() {
        let directory = TempDir::new().expect("failed to create temp dir");
        let path = directory.path().join("preview.unknown");
        let img = bitboard_to_image(&array![[1u8]]);

        let result = export_preview(&img, &path);
        assert!(matches!(result, Err(SynthesisError::ImageExport { .. })));
    }
}
