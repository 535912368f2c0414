// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Color palettes used by quantize and ordinal scales.

use peniko::Color;

/// Seven-step sequential blues, light to dark.
pub const BLUES_7: [Color; 7] = [
    Color::from_rgb8(0xef, 0xf3, 0xff),
    Color::from_rgb8(0xc6, 0xdb, 0xef),
    Color::from_rgb8(0x9e, 0xca, 0xe1),
    Color::from_rgb8(0x6b, 0xae, 0xd6),
    Color::from_rgb8(0x42, 0x92, 0xc6),
    Color::from_rgb8(0x21, 0x71, 0xb5),
    Color::from_rgb8(0x08, 0x45, 0x94),
];

/// Ten-color categorical palette.
pub const CATEGORY_10: [Color; 10] = [
    Color::from_rgb8(0x1f, 0x77, 0xb4),
    Color::from_rgb8(0xff, 0x7f, 0x0e),
    Color::from_rgb8(0x2c, 0xa0, 0x2c),
    Color::from_rgb8(0xd6, 0x27, 0x28),
    Color::from_rgb8(0x94, 0x67, 0xbd),
    Color::from_rgb8(0x8c, 0x56, 0x4b),
    Color::from_rgb8(0xe3, 0x77, 0xc2),
    Color::from_rgb8(0x7f, 0x7f, 0x7f),
    Color::from_rgb8(0xbc, 0xbd, 0x22),
    Color::from_rgb8(0x17, 0xbe, 0xcf),
];

/// Twelve-color pastel categorical palette.
pub const SET_3: [Color; 12] = [
    Color::from_rgb8(0x8d, 0xd3, 0xc7),
    Color::from_rgb8(0xff, 0xff, 0xb3),
    Color::from_rgb8(0xbe, 0xba, 0xda),
    Color::from_rgb8(0xfb, 0x80, 0x72),
    Color::from_rgb8(0x80, 0xb1, 0xd3),
    Color::from_rgb8(0xfd, 0xb4, 0x62),
    Color::from_rgb8(0xb3, 0xde, 0x69),
    Color::from_rgb8(0xfc, 0xcd, 0xe5),
    Color::from_rgb8(0xd9, 0xd9, 0xd9),
    Color::from_rgb8(0xbc, 0x80, 0xbd),
    Color::from_rgb8(0xcc, 0xeb, 0xc5),
    Color::from_rgb8(0xff, 0xed, 0x6f),
];
