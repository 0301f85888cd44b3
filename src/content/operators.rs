//! PDF content stream operators.
//!
//! Every operator of ISO 32000-1:2008 Annex A is a variant of [`Operator`].
//! Keywords are resolved once, when the stream is tokenized; the rewriter
//! then only dispatches on [`OperatorCategory`].

/// A content stream operator keyword.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    // General graphics state
    /// Set line width (w)
    SetLineWidth,
    /// Set line cap style (J)
    SetLineCap,
    /// Set line join style (j)
    SetLineJoin,
    /// Set miter limit (M)
    SetMiterLimit,
    /// Set dash pattern (d)
    SetDash,
    /// Set rendering intent (ri)
    SetRenderingIntent,
    /// Set flatness tolerance (i)
    SetFlatness,
    /// Set extended graphics state (gs)
    SetExtGState,

    // Special graphics state
    /// Save graphics state (q)
    SaveState,
    /// Restore graphics state (Q)
    RestoreState,
    /// Modify current transformation matrix (cm)
    Cm,

    // Path construction
    /// Begin new subpath (m)
    MoveTo,
    /// Append straight line (l)
    LineTo,
    /// Append cubic Bézier curve (c)
    CurveTo,
    /// Bézier curve, first control point = current point (v)
    CurveToV,
    /// Bézier curve, second control point = end point (y)
    CurveToY,
    /// Close subpath (h)
    ClosePath,
    /// Append rectangle (re)
    Rectangle,

    // Path painting
    /// Stroke path (S)
    Stroke,
    /// Close and stroke path (s)
    CloseStroke,
    /// Fill path, nonzero winding (f)
    Fill,
    /// Fill path, obsolete form (F)
    FillObsolete,
    /// Fill path, even-odd (f*)
    FillEvenOdd,
    /// Fill and stroke, nonzero (B)
    FillStroke,
    /// Fill and stroke, even-odd (B*)
    FillStrokeEvenOdd,
    /// Close, fill and stroke, nonzero (b)
    CloseFillStroke,
    /// Close, fill and stroke, even-odd (b*)
    CloseFillStrokeEvenOdd,
    /// End path without painting (n)
    EndPath,

    // Clipping
    /// Clip, nonzero winding (W)
    ClipNonZero,
    /// Clip, even-odd (W*)
    ClipEvenOdd,

    // Text objects
    /// Begin text object (BT)
    BeginText,
    /// End text object (ET)
    EndText,

    // Text state
    /// Character spacing (Tc)
    Tc,
    /// Word spacing (Tw)
    Tw,
    /// Horizontal scaling (Tz)
    Tz,
    /// Leading (TL)
    TL,
    /// Font and size (Tf)
    Tf,
    /// Rendering mode (Tr)
    Tr,
    /// Rise (Ts)
    Ts,

    // Text positioning
    /// Move text position (Td)
    Td,
    /// Move text position and set leading (TD)
    TD,
    /// Set text matrix (Tm)
    Tm,
    /// Move to start of next line (T*)
    TStar,

    // Text showing
    /// Show text (Tj)
    Tj,
    /// Show text with glyph positioning (TJ)
    TJ,
    /// Next line and show text (')
    Quote,
    /// Set spacing, next line and show text (")
    DoubleQuote,

    // Type 3 fonts
    /// Glyph width (d0)
    SetGlyphWidth,
    /// Glyph width and bounding box (d1)
    SetGlyphWidthAndBBox,

    // Color
    /// Set stroke color space (CS)
    SetStrokeColorSpace,
    /// Set fill color space (cs)
    SetFillColorSpace,
    /// Set stroke color (SC)
    SetStrokeColor,
    /// Set stroke color, pattern capable (SCN)
    SetStrokeColorN,
    /// Set fill color (sc)
    SetFillColor,
    /// Set fill color, pattern capable (scn)
    SetFillColorN,
    /// Set gray stroke color (G)
    SetStrokeGray,
    /// Set gray fill color (g)
    SetFillGray,
    /// Set RGB stroke color (RG)
    SetStrokeRgb,
    /// Set RGB fill color (rg)
    SetFillRgb,
    /// Set CMYK stroke color (K)
    SetStrokeCmyk,
    /// Set CMYK fill color (k)
    SetFillCmyk,

    // Shading, XObjects, inline images
    /// Paint shading (sh)
    PaintShading,
    /// Invoke external object (Do)
    Do,
    /// Begin inline image (BI)
    BeginInlineImage,
    /// Begin inline image data (ID)
    InlineImageData,
    /// End inline image (EI)
    EndInlineImage,

    // Marked content
    /// Marked-content point (MP)
    MarkPoint,
    /// Marked-content point with properties (DP)
    MarkPointDict,
    /// Begin marked content (BMC)
    BeginMarkedContent,
    /// Begin marked content with properties (BDC)
    BeginMarkedContentDict,
    /// End marked content (EMC)
    EndMarkedContent,

    // Compatibility
    /// Begin compatibility section (BX)
    BeginCompat,
    /// End compatibility section (EX)
    EndCompat,

    /// Unrecognized keyword, kept verbatim (one char per byte)
    Other(String),
}

/// How an operator affects spot color filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorCategory {
    /// Selects a color space (cs, CS)
    ColorSpace,
    /// Sets a color value in the current space (sc, SC, scn, SCN)
    ColorValue,
    /// Sets a DeviceCMYK process color (k, K)
    ProcessColor,
    /// Starts path construction (m, re)
    PathStart,
    /// Ends a path by painting it (S s f F f* B B* b b* n)
    PathPaint,
    /// Paints an external object (Do)
    XObject,
    /// Opens a text object (BT)
    BeginText,
    /// Closes a text object (ET)
    EndText,
    /// Anything else
    Other,
}

impl Operator {
    /// Resolve a keyword to its operator.
    pub fn from_keyword(keyword: &[u8]) -> Self {
        match keyword {
            b"w" => Operator::SetLineWidth,
            b"J" => Operator::SetLineCap,
            b"j" => Operator::SetLineJoin,
            b"M" => Operator::SetMiterLimit,
            b"d" => Operator::SetDash,
            b"ri" => Operator::SetRenderingIntent,
            b"i" => Operator::SetFlatness,
            b"gs" => Operator::SetExtGState,
            b"q" => Operator::SaveState,
            b"Q" => Operator::RestoreState,
            b"cm" => Operator::Cm,
            b"m" => Operator::MoveTo,
            b"l" => Operator::LineTo,
            b"c" => Operator::CurveTo,
            b"v" => Operator::CurveToV,
            b"y" => Operator::CurveToY,
            b"h" => Operator::ClosePath,
            b"re" => Operator::Rectangle,
            b"S" => Operator::Stroke,
            b"s" => Operator::CloseStroke,
            b"f" => Operator::Fill,
            b"F" => Operator::FillObsolete,
            b"f*" => Operator::FillEvenOdd,
            b"B" => Operator::FillStroke,
            b"B*" => Operator::FillStrokeEvenOdd,
            b"b" => Operator::CloseFillStroke,
            b"b*" => Operator::CloseFillStrokeEvenOdd,
            b"n" => Operator::EndPath,
            b"W" => Operator::ClipNonZero,
            b"W*" => Operator::ClipEvenOdd,
            b"BT" => Operator::BeginText,
            b"ET" => Operator::EndText,
            b"Tc" => Operator::Tc,
            b"Tw" => Operator::Tw,
            b"Tz" => Operator::Tz,
            b"TL" => Operator::TL,
            b"Tf" => Operator::Tf,
            b"Tr" => Operator::Tr,
            b"Ts" => Operator::Ts,
            b"Td" => Operator::Td,
            b"TD" => Operator::TD,
            b"Tm" => Operator::Tm,
            b"T*" => Operator::TStar,
            b"Tj" => Operator::Tj,
            b"TJ" => Operator::TJ,
            b"'" => Operator::Quote,
            b"\"" => Operator::DoubleQuote,
            b"d0" => Operator::SetGlyphWidth,
            b"d1" => Operator::SetGlyphWidthAndBBox,
            b"CS" => Operator::SetStrokeColorSpace,
            b"cs" => Operator::SetFillColorSpace,
            b"SC" => Operator::SetStrokeColor,
            b"SCN" => Operator::SetStrokeColorN,
            b"sc" => Operator::SetFillColor,
            b"scn" => Operator::SetFillColorN,
            b"G" => Operator::SetStrokeGray,
            b"g" => Operator::SetFillGray,
            b"RG" => Operator::SetStrokeRgb,
            b"rg" => Operator::SetFillRgb,
            b"K" => Operator::SetStrokeCmyk,
            b"k" => Operator::SetFillCmyk,
            b"sh" => Operator::PaintShading,
            b"Do" => Operator::Do,
            b"BI" => Operator::BeginInlineImage,
            b"ID" => Operator::InlineImageData,
            b"EI" => Operator::EndInlineImage,
            b"MP" => Operator::MarkPoint,
            b"DP" => Operator::MarkPointDict,
            b"BMC" => Operator::BeginMarkedContent,
            b"BDC" => Operator::BeginMarkedContentDict,
            b"EMC" => Operator::EndMarkedContent,
            b"BX" => Operator::BeginCompat,
            b"EX" => Operator::EndCompat,
            other => Operator::Other(other.iter().map(|&b| char::from(b)).collect()),
        }
    }

    /// The keyword written for this operator.
    pub fn keyword(&self) -> &str {
        match self {
            Operator::SetLineWidth => "w",
            Operator::SetLineCap => "J",
            Operator::SetLineJoin => "j",
            Operator::SetMiterLimit => "M",
            Operator::SetDash => "d",
            Operator::SetRenderingIntent => "ri",
            Operator::SetFlatness => "i",
            Operator::SetExtGState => "gs",
            Operator::SaveState => "q",
            Operator::RestoreState => "Q",
            Operator::Cm => "cm",
            Operator::MoveTo => "m",
            Operator::LineTo => "l",
            Operator::CurveTo => "c",
            Operator::CurveToV => "v",
            Operator::CurveToY => "y",
            Operator::ClosePath => "h",
            Operator::Rectangle => "re",
            Operator::Stroke => "S",
            Operator::CloseStroke => "s",
            Operator::Fill => "f",
            Operator::FillObsolete => "F",
            Operator::FillEvenOdd => "f*",
            Operator::FillStroke => "B",
            Operator::FillStrokeEvenOdd => "B*",
            Operator::CloseFillStroke => "b",
            Operator::CloseFillStrokeEvenOdd => "b*",
            Operator::EndPath => "n",
            Operator::ClipNonZero => "W",
            Operator::ClipEvenOdd => "W*",
            Operator::BeginText => "BT",
            Operator::EndText => "ET",
            Operator::Tc => "Tc",
            Operator::Tw => "Tw",
            Operator::Tz => "Tz",
            Operator::TL => "TL",
            Operator::Tf => "Tf",
            Operator::Tr => "Tr",
            Operator::Ts => "Ts",
            Operator::Td => "Td",
            Operator::TD => "TD",
            Operator::Tm => "Tm",
            Operator::TStar => "T*",
            Operator::Tj => "Tj",
            Operator::TJ => "TJ",
            Operator::Quote => "'",
            Operator::DoubleQuote => "\"",
            Operator::SetGlyphWidth => "d0",
            Operator::SetGlyphWidthAndBBox => "d1",
            Operator::SetStrokeColorSpace => "CS",
            Operator::SetFillColorSpace => "cs",
            Operator::SetStrokeColor => "SC",
            Operator::SetStrokeColorN => "SCN",
            Operator::SetFillColor => "sc",
            Operator::SetFillColorN => "scn",
            Operator::SetStrokeGray => "G",
            Operator::SetFillGray => "g",
            Operator::SetStrokeRgb => "RG",
            Operator::SetFillRgb => "rg",
            Operator::SetStrokeCmyk => "K",
            Operator::SetFillCmyk => "k",
            Operator::PaintShading => "sh",
            Operator::Do => "Do",
            Operator::BeginInlineImage => "BI",
            Operator::InlineImageData => "ID",
            Operator::EndInlineImage => "EI",
            Operator::MarkPoint => "MP",
            Operator::MarkPointDict => "DP",
            Operator::BeginMarkedContent => "BMC",
            Operator::BeginMarkedContentDict => "BDC",
            Operator::EndMarkedContent => "EMC",
            Operator::BeginCompat => "BX",
            Operator::EndCompat => "EX",
            Operator::Other(name) => name.as_str(),
        }
    }

    /// Classify the operator for the spot color state machine.
    pub fn category(&self) -> OperatorCategory {
        match self {
            Operator::SetFillColorSpace | Operator::SetStrokeColorSpace => {
                OperatorCategory::ColorSpace
            },
            Operator::SetFillColor
            | Operator::SetStrokeColor
            | Operator::SetFillColorN
            | Operator::SetStrokeColorN => OperatorCategory::ColorValue,
            Operator::SetFillCmyk | Operator::SetStrokeCmyk => OperatorCategory::ProcessColor,
            Operator::MoveTo | Operator::Rectangle => OperatorCategory::PathStart,
            Operator::Stroke
            | Operator::CloseStroke
            | Operator::Fill
            | Operator::FillObsolete
            | Operator::FillEvenOdd
            | Operator::FillStroke
            | Operator::FillStrokeEvenOdd
            | Operator::CloseFillStroke
            | Operator::CloseFillStrokeEvenOdd
            | Operator::EndPath => OperatorCategory::PathPaint,
            Operator::Do => OperatorCategory::XObject,
            Operator::BeginText => OperatorCategory::BeginText,
            Operator::EndText => OperatorCategory::EndText,
            _ => OperatorCategory::Other,
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}
