use image::GrayImage;
use image::imageops;
use serde::Serialize;

const HEADER_END_PERCENT: u32 = 22;
const BODY_END_PERCENT: u32 = 80;
const FOOTER_START_PERCENT: u32 = 82;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Header,
    Body,
    Footer,
    FullPage,
}

impl Region {
    pub const ALL: [Region; 4] = [Region::Header, Region::Body, Region::Footer, Region::FullPage];

    pub fn as_str(self) -> &'static str {
        match self {
            Region::Header => "header",
            Region::Body => "body",
            Region::Footer => "footer",
            Region::FullPage => "full_page",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Region::Header => 0,
            Region::Body => 1,
            Region::Footer => 2,
            Region::FullPage => 3,
        }
    }

    /// Row span `[start, end)` of this band on a page `height` pixels tall.
    pub fn rows(self, height: u32) -> (u32, u32) {
        let at = |percent: u32| (u64::from(height) * u64::from(percent) / 100) as u32;
        match self {
            Region::Header => (0, at(HEADER_END_PERCENT)),
            Region::Body => (at(HEADER_END_PERCENT), at(BODY_END_PERCENT)),
            Region::Footer => (at(FOOTER_START_PERCENT), height),
            Region::FullPage => (0, height),
        }
    }
}

pub fn crop_region(page: &GrayImage, region: Region) -> Option<GrayImage> {
    let (start, end) = region.rows(page.height());
    if end <= start || page.width() == 0 {
        return None;
    }

    Some(imageops::crop_imm(page, 0, start, page.width(), end - start).to_image())
}
