// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

/// Width thresholds for responsive behavior, in whatever unit the host
/// measures width in. A width below `mobile_below` gets the narrow
/// presentation; one below `compact_toolbar_below` gets the abbreviated
/// toolbar. The defaults carry over from the breakpoints the product shipped
/// with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportBreakpoints {
    pub mobile_below: u16,
    pub compact_toolbar_below: u16,
}

impl ViewportBreakpoints {
    pub const DEFAULT: Self = Self {
        mobile_below: 624,
        compact_toolbar_below: 768,
    };

    pub const fn classify(self, width: u16) -> ViewportClass {
        ViewportClass {
            is_mobile: width < self.mobile_below,
            is_compact_toolbar: width < self.compact_toolbar_below,
        }
    }
}

impl Default for ViewportBreakpoints {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewportClass {
    pub is_mobile: bool,
    pub is_compact_toolbar: bool,
}
