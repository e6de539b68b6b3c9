mod common;

use common::{decode, decode_file, TestEnv};
use image::{GenericImageView, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use qrcompose::qrcode::{QrCodeEcc, Version};
use qrcompose::{compose, encode, render, ComposeError, ComposeOptions};

// =============================================================================
// Round trips
// =============================================================================

#[test]
fn test_default_request_writes_decodable_png() {
    let env = TestEnv::new();
    let request = env.request("https://example.com", "qr_code.png");

    compose(&request).unwrap();

    let path = env.path("qr_code.png");
    assert!(path.exists());
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);

    let img = image::load_from_memory(&bytes).unwrap();
    assert_eq!(img.dimensions(), (290, 290));

    let decoded = decode_file(&path);
    assert_eq!(decoded.version, 1);
    assert_eq!(decoded.payload, b"https://example.com");
}

#[test]
fn test_payloads_decode_back_unchanged() {
    let env = TestEnv::new();
    let texts = [
        "0123456789",
        "HELLO WORLD",
        "https://example.com/path?q=1&r=two#frag",
        "héllo wörld, ünïcode ✓ 日本語",
    ];

    for text in texts {
        let request = ComposeOptions {
            module_size: Some(6),
            ..env.options(text, "unused.png")
        }
        .resolve()
        .unwrap();
        let img = render(&request).unwrap();
        assert_eq!(decode(&img).payload, text.as_bytes(), "payload {text:?}");
    }
}

#[test]
fn test_payload_grows_past_requested_version() {
    let env = TestEnv::new();
    let text = "a".repeat(500);
    let request = ComposeOptions {
        module_size: Some(3),
        ..env.options(&text, "big.png")
    }
    .resolve()
    .unwrap();

    let img = render(&request).unwrap();
    let expected = encode(&text, QrCodeEcc::Low, Version::MIN).unwrap();
    let side = (expected.size() as u32 + 8) * 3;
    assert_eq!(img.dimensions(), (side, side));

    let decoded = decode(&img);
    assert!(decoded.version > 1);
    assert_eq!(decoded.version, usize::from(expected.version().value()));
    assert_eq!(decoded.payload, text.as_bytes());
}

#[test]
fn test_requested_version_is_kept_when_payload_fits() {
    let env = TestEnv::new();
    let request = ComposeOptions {
        version: Some(10),
        module_size: Some(4),
        ..env.options("short", "v10.png")
    }
    .resolve()
    .unwrap();

    let img = render(&request).unwrap();
    // Version 10 is 57 modules wide
    assert_eq!(img.dimensions(), ((57 + 8) * 4, (57 + 8) * 4));

    let decoded = decode(&img);
    assert_eq!(decoded.version, 10);
    assert_eq!(decoded.payload, b"short");
}

#[test]
fn test_every_error_correction_level_decodes() {
    let env = TestEnv::new();
    for tier in ["L", "M", "Q", "H"] {
        let request = ComposeOptions {
            error_correction: Some(tier.to_string()),
            ..env.options("https://example.com/levels", "unused.png")
        }
        .resolve()
        .unwrap();
        let img = render(&request).unwrap();
        assert_eq!(decode(&img).payload, b"https://example.com/levels", "level {tier}");
    }
}

// =============================================================================
// Styling and decoration
// =============================================================================

#[test]
fn test_custom_colors_and_geometry() {
    let env = TestEnv::new();
    let request = ComposeOptions {
        module_size: Some(5),
        border: Some(2),
        fill_color: Some("navy".into()),
        back_color: Some("#fffff0".into()),
        ..env.options("colors", "colors.png")
    }
    .resolve()
    .unwrap();

    let img = render(&request).unwrap();
    assert_eq!(img.dimensions(), ((21 + 4) * 5, (21 + 4) * 5));
    // Quiet zone, then the top-left finder's dark corner
    assert_eq!(*img.get_pixel(0, 0), Rgb([255, 255, 240]));
    assert_eq!(*img.get_pixel(10, 10), Rgb([0, 0, 128]));
    assert_eq!(decode(&img).payload, b"colors");
}

#[test]
fn test_unknown_level_renders_like_low() {
    let env = TestEnv::new();
    let with_tier = |tier: &str| {
        let request = ComposeOptions {
            error_correction: Some(tier.to_string()),
            ..env.options("https://example.com", "unused.png")
        }
        .resolve()
        .unwrap();
        render(&request).unwrap()
    };

    assert_eq!(with_tier("Z"), with_tier("L"));
}

#[test]
fn test_output_is_deterministic() {
    let env = TestEnv::new();
    for name in ["a.png", "b.png"] {
        let request = ComposeOptions {
            frame_text: Some("Same".into()),
            ..env.options("https://example.com/same", name)
        }
        .resolve()
        .unwrap();
        compose(&request).unwrap();
    }

    let a = std::fs::read(env.path("a.png")).unwrap();
    let b = std::fs::read(env.path("b.png")).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_frame_adds_margins_and_still_decodes() {
    let env = TestEnv::new();
    let request = ComposeOptions {
        frame_text: Some("Scan me".into()),
        ..env.options("https://example.com", "framed.png")
    }
    .resolve()
    .unwrap();

    let img = render(&request).unwrap();
    assert_eq!(img.dimensions(), (290 + 40, 290 + 80));
    // Frame corners are background
    assert_eq!(*img.get_pixel(0, 0), Rgb([255, 255, 255]));
    assert_eq!(*img.get_pixel(329, 369), Rgb([255, 255, 255]));

    // Caption ink sits in the band below the symbol
    let caption_band = (40 + 290)..(370 - 20);
    let inked = (0..330)
        .flat_map(|x| caption_band.clone().map(move |y| (x, y)))
        .any(|(x, y)| *img.get_pixel(x, y) == Rgb([0, 0, 0]));
    assert!(inked);

    assert_eq!(decode(&img).payload, b"https://example.com");
}

#[test]
fn test_empty_caption_means_no_frame() {
    let env = TestEnv::new();
    let request = ComposeOptions {
        frame_text: Some(String::new()),
        ..env.options("https://example.com", "unused.png")
    }
    .resolve()
    .unwrap();

    let img = render(&request).unwrap();
    assert_eq!(img.dimensions(), (290, 290));
    assert_eq!(img, render(&env.request("https://example.com", "unused.png")).unwrap());
}

#[test]
fn test_empty_logo_path_is_ignored() {
    let env = TestEnv::new();
    let request = ComposeOptions {
        logo: Some("".into()),
        ..env.options("https://example.com", "out.png")
    }
    .resolve()
    .unwrap();

    compose(&request).unwrap();
    assert_eq!(decode_file(&env.path("out.png")).payload, b"https://example.com");
}

#[test]
fn test_caption_wider_than_canvas_is_clipped() {
    let env = TestEnv::new();
    // 60 glyphs need 480 pixels; the framed canvas is 330 wide
    let caption = "W".repeat(60);
    let request = ComposeOptions {
        frame_text: Some(caption),
        ..env.options("https://example.com", "unused.png")
    }
    .resolve()
    .unwrap();

    let img = render(&request).unwrap();
    assert_eq!(img.dimensions(), (330, 370));

    // Ink reaches both canvas edges
    let band = 330..350;
    let inked_in = |columns: std::ops::Range<u32>| {
        columns.flat_map(|x| band.clone().map(move |y| (x, y)))
            .any(|(x, y)| *img.get_pixel(x, y) == Rgb([0, 0, 0]))
    };
    assert!(inked_in(0..8));
    assert!(inked_in(322..330));
    assert_eq!(decode(&img).payload, b"https://example.com");
}

#[test]
fn test_caption_without_glyphs_draws_question_marks() {
    let env = TestEnv::new();
    let framed = |caption: &str| {
        let request = ComposeOptions {
            frame_text: Some(caption.to_string()),
            ..env.options("https://example.com", "unused.png")
        }
        .resolve()
        .unwrap();
        render(&request).unwrap()
    };

    let img = framed("日本語");
    assert_eq!(img.dimensions(), (330, 370));
    assert_eq!(img, framed("???"));
}

#[test]
fn test_transparent_logo_keeps_uncovered_modules() {
    let env = TestEnv::new();
    let mut logo = RgbaImage::from_pixel(50, 50, Rgba([0, 0, 0, 0]));
    for y in 20..30 {
        for x in 20..30 {
            logo.put_pixel(x, y, Rgba([255, 0, 0, 255]));
        }
    }
    let logo_path = env.path("logo.png");
    logo.save(&logo_path).unwrap();

    let options = ComposeOptions {
        error_correction: Some("H".into()),
        ..env.options("https://example.com", "unused.png")
    };
    let plain = render(&options.clone().resolve().unwrap()).unwrap();
    let request = ComposeOptions {
        logo: Some(logo_path),
        ..options
    }
    .resolve()
    .unwrap();
    let img = render(&request).unwrap();
    assert_eq!(img.dimensions(), plain.dimensions());

    // The logo area starts at (290 - 58) / 2 = 116; its transparent corner leaves the symbol
    assert_eq!(img.get_pixel(116, 116), plain.get_pixel(116, 116));

    let Rgb([r, g, b]) = *img.get_pixel(145, 145);
    assert!(r > 240 && g < 15 && b < 15, "center should be red, got {:?}", (r, g, b));

    assert_eq!(decode(&img).payload, b"https://example.com");
}

#[test]
fn test_opaque_logo_covers_its_square() {
    let env = TestEnv::new();
    let logo_path = env.path("logo.png");
    RgbImage::from_pixel(40, 40, Rgb([0, 200, 0])).save(&logo_path).unwrap();

    let request = ComposeOptions {
        logo: Some(logo_path),
        ..env.options("https://example.com", "unused.png")
    }
    .resolve()
    .unwrap();
    let img = render(&request).unwrap();

    for y in 116..116 + 58 {
        for x in 116..116 + 58 {
            let Rgb([r, g, b]) = *img.get_pixel(x, y);
            assert!(r < 5 && (195..=205).contains(&g) && b < 5, "pixel ({x}, {y}) = {:?}", (r, g, b));
        }
    }
}

#[test]
fn test_jpeg_output() {
    let env = TestEnv::new();
    let request = ComposeOptions {
        format: Some("jpeg".into()),
        ..env.options("https://example.com/jpeg", "qr.jpg")
    }
    .resolve()
    .unwrap();

    compose(&request).unwrap();

    let bytes = std::fs::read(env.path("qr.jpg")).unwrap();
    assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);
    assert_eq!(image::load_from_memory(&bytes).unwrap().dimensions(), (290, 290));
    assert_eq!(decode_file(&env.path("qr.jpg")).payload, b"https://example.com/jpeg");
}

#[test]
fn test_format_wins_over_extension() {
    let env = TestEnv::new();
    let request = env.request("https://example.com", "qr.jpg");

    compose(&request).unwrap();

    let bytes = std::fs::read(env.path("qr.jpg")).unwrap();
    assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);
}

// =============================================================================
// Failures leave no file behind
// =============================================================================

#[test]
fn test_empty_text_fails_without_output() {
    let env = TestEnv::new();
    let err = compose(&env.request("", "empty.png")).unwrap_err();

    assert!(matches!(err, ComposeError::EmptyPayload));
    assert!(!env.path("empty.png").exists());
}

#[test]
fn test_oversized_payload_fails_without_output() {
    let env = TestEnv::new();
    let text = "x".repeat(1300);
    let request = ComposeOptions {
        error_correction: Some("H".into()),
        ..env.options(&text, "big.png")
    }
    .resolve()
    .unwrap();

    let err = compose(&request).unwrap_err();
    assert!(matches!(err, ComposeError::PayloadTooLarge { ecc: QrCodeEcc::High, .. }));
    assert!(!env.path("big.png").exists());
}

#[test]
fn test_unreadable_logo_fails_without_output() {
    let env = TestEnv::new();
    let logo = env.write_file("logo.png", b"this is not an image");
    let request = ComposeOptions {
        logo: Some(logo.clone()),
        ..env.options("https://example.com", "out.png")
    }
    .resolve()
    .unwrap();

    match compose(&request).unwrap_err() {
        ComposeError::LogoUnreadable { path, .. } => assert_eq!(path, logo),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!env.path("out.png").exists());
    assert_eq!(env.file_count(), 1);
}

#[test]
fn test_missing_logo_fails() {
    let env = TestEnv::new();
    let request = ComposeOptions {
        logo: Some(env.path("nowhere.png")),
        ..env.options("https://example.com", "out.png")
    }
    .resolve()
    .unwrap();

    let err = compose(&request).unwrap_err();
    assert!(matches!(err, ComposeError::LogoUnreadable { .. }));
    assert_eq!(env.file_count(), 0);
}

#[test]
fn test_unwritable_destination_fails() {
    let env = TestEnv::new();
    let request = env.request("https://example.com", "missing_dir/qr.png");

    let err = compose(&request).unwrap_err();
    assert!(matches!(err, ComposeError::EncodeOrWrite { .. }));
    assert!(err.to_string().contains("missing_dir"));
    assert_eq!(env.file_count(), 0);
}

#[test]
fn test_invalid_options_are_rejected_before_composing() {
    let env = TestEnv::new();
    let cases = [
        ComposeOptions { fill_color: Some("notacolor".into()), ..env.options("x", "a.png") },
        ComposeOptions { back_color: Some("#12345".into()), ..env.options("x", "a.png") },
        ComposeOptions { version: Some(41), ..env.options("x", "a.png") },
        ComposeOptions { module_size: Some(0), ..env.options("x", "a.png") },
        ComposeOptions { format: Some("docx".into()), ..env.options("x", "a.png") },
    ];

    for options in cases {
        let err = options.resolve().unwrap_err();
        assert!(matches!(err, ComposeError::InvalidParameter { .. }), "{err}");
    }
    assert_eq!(env.file_count(), 0);
}
