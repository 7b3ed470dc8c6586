//! 内置的四套模板

use crate::template::style::{Border, Color, SlotStyle, StyleSlot};
use crate::template::TemplateId;

type Entries = Vec<(StyleSlot, SlotStyle)>;

pub fn entries(template: TemplateId) -> Entries {
    match template {
        TemplateId::Classic => classic(),
        TemplateId::Modern => modern(),
        TemplateId::Minimal => minimal(),
        TemplateId::Academic => academic(),
    }
}

fn classic() -> Entries {
    const SERIF: &str = "Times New Roman";
    let ink = Color(0x222222);
    let muted = Color(0x555555);
    let rule = Color(0x333333);

    vec![
        (StyleSlot::Document, SlotStyle::text(SERIF, 11.0, ink)),
        (
            StyleSlot::HeaderBand,
            SlotStyle::text(SERIF, 11.0, ink)
                .centered()
                .spacing(0.0, 12.0)
                .border(Border::Bottom { width_pt: 1.5, color: rule }),
        ),
        (
            StyleSlot::Name,
            SlotStyle::text(SERIF, 24.0, ink).bold().centered().spacing(0.0, 4.0),
        ),
        (
            StyleSlot::Subtitle,
            SlotStyle::text(SERIF, 13.0, muted).italic().centered().spacing(0.0, 2.0),
        ),
        (
            StyleSlot::ContactLine,
            SlotStyle::text(SERIF, 10.0, muted).centered().spacing(0.0, 6.0),
        ),
        (
            StyleSlot::SectionWrapper,
            SlotStyle::text(SERIF, 11.0, ink).spacing(10.0, 6.0).avoid_break_inside(),
        ),
        (
            StyleSlot::SectionTitle,
            SlotStyle::text(SERIF, 14.0, ink)
                .bold()
                .uppercase()
                .spacing(6.0, 6.0)
                .border(Border::Bottom { width_pt: 0.75, color: rule }),
        ),
        (StyleSlot::ItemWrapper, SlotStyle::text(SERIF, 11.0, ink).spacing(0.0, 6.0)),
        (StyleSlot::ItemTitle, SlotStyle::text(SERIF, 11.5, ink).bold()),
        (StyleSlot::ItemSubtitle, SlotStyle::text(SERIF, 10.5, muted).italic()),
        (StyleSlot::ItemDetail, SlotStyle::text(SERIF, 10.0, ink)),
        (
            StyleSlot::Table,
            SlotStyle::text(SERIF, 10.0, ink)
                .spacing(4.0, 8.0)
                .border(Border::All { width_pt: 0.5, color: rule }),
        ),
        (
            StyleSlot::TableHeaderCell,
            SlotStyle::text(SERIF, 10.0, ink).bold().background(Color(0xE8E8E8)),
        ),
        (StyleSlot::TableCell, SlotStyle::text(SERIF, 10.0, ink)),
        (
            StyleSlot::PublicationEntry,
            SlotStyle::text(SERIF, 10.5, ink).spacing(0.0, 5.0),
        ),
    ]
}

fn modern() -> Entries {
    const SANS: &str = "Helvetica";
    let ink = Color(0x1F2937);
    let accent = Color(0x2563EB);
    let muted = Color(0x6B7280);

    vec![
        (StyleSlot::Document, SlotStyle::text(SANS, 10.5, ink)),
        (
            StyleSlot::HeaderBand,
            SlotStyle::text(SANS, 10.5, Color::WHITE)
                .background(Color(0x1E3A8A))
                .spacing(0.0, 14.0),
        ),
        (
            StyleSlot::Name,
            SlotStyle::text(SANS, 26.0, Color::WHITE).bold().spacing(0.0, 4.0),
        ),
        (
            StyleSlot::Subtitle,
            SlotStyle::text(SANS, 12.0, Color(0xDBEAFE)).spacing(0.0, 2.0),
        ),
        (
            StyleSlot::ContactLine,
            SlotStyle::text(SANS, 9.5, Color(0xDBEAFE)).spacing(0.0, 4.0),
        ),
        (
            StyleSlot::SectionWrapper,
            SlotStyle::text(SANS, 10.5, ink).spacing(12.0, 4.0).avoid_break_inside(),
        ),
        (
            StyleSlot::SectionTitle,
            SlotStyle::text(SANS, 13.0, accent)
                .bold()
                .uppercase()
                .spacing(4.0, 6.0)
                .border(Border::Left { width_pt: 3.0, color: accent }),
        ),
        (StyleSlot::ItemWrapper, SlotStyle::text(SANS, 10.5, ink).spacing(0.0, 8.0)),
        (StyleSlot::ItemTitle, SlotStyle::text(SANS, 11.0, ink).bold()),
        (StyleSlot::ItemSubtitle, SlotStyle::text(SANS, 9.5, muted)),
        (StyleSlot::ItemDetail, SlotStyle::text(SANS, 9.5, ink)),
        (
            StyleSlot::Table,
            SlotStyle::text(SANS, 9.5, ink)
                .spacing(4.0, 8.0)
                .border(Border::Bottom { width_pt: 0.5, color: Color(0xD1D5DB) }),
        ),
        (
            StyleSlot::TableHeaderCell,
            SlotStyle::text(SANS, 9.5, Color::WHITE).bold().background(accent),
        ),
        (StyleSlot::TableCell, SlotStyle::text(SANS, 9.5, ink)),
        (
            StyleSlot::PublicationEntry,
            SlotStyle::text(SANS, 10.0, ink)
                .spacing(0.0, 6.0)
                .border(Border::Left { width_pt: 1.5, color: Color(0xBFDBFE) }),
        ),
    ]
}

fn minimal() -> Entries {
    const SANS: &str = "Arial";
    let ink = Color(0x111111);
    let muted = Color(0x777777);

    vec![
        (StyleSlot::Document, SlotStyle::text(SANS, 10.0, ink)),
        (StyleSlot::HeaderBand, SlotStyle::text(SANS, 10.0, ink).spacing(0.0, 16.0)),
        (StyleSlot::Name, SlotStyle::text(SANS, 20.0, ink).spacing(0.0, 2.0)),
        (StyleSlot::Subtitle, SlotStyle::text(SANS, 11.0, muted)),
        (StyleSlot::ContactLine, SlotStyle::text(SANS, 9.0, muted).spacing(2.0, 0.0)),
        (StyleSlot::SectionWrapper, SlotStyle::text(SANS, 10.0, ink).spacing(14.0, 0.0)),
        (
            StyleSlot::SectionTitle,
            SlotStyle::text(SANS, 11.0, ink).bold().uppercase().spacing(0.0, 6.0),
        ),
        (StyleSlot::ItemWrapper, SlotStyle::text(SANS, 10.0, ink).spacing(0.0, 6.0)),
        (StyleSlot::ItemTitle, SlotStyle::text(SANS, 10.0, ink).bold()),
        (StyleSlot::ItemSubtitle, SlotStyle::text(SANS, 9.0, muted)),
        (StyleSlot::ItemDetail, SlotStyle::text(SANS, 9.0, ink)),
        (StyleSlot::Table, SlotStyle::text(SANS, 9.0, ink).spacing(2.0, 6.0)),
        (StyleSlot::TableHeaderCell, SlotStyle::text(SANS, 9.0, muted).bold()),
        (StyleSlot::TableCell, SlotStyle::text(SANS, 9.0, ink)),
        (StyleSlot::PublicationEntry, SlotStyle::text(SANS, 9.5, ink).spacing(0.0, 4.0)),
    ]
}

fn academic() -> Entries {
    const SERIF: &str = "Georgia";
    let ink = Color(0x1A1A1A);
    let maroon = Color(0x7F1D1D);
    let muted = Color(0x4B5563);

    vec![
        (StyleSlot::Document, SlotStyle::text(SERIF, 10.5, ink)),
        (
            StyleSlot::HeaderBand,
            SlotStyle::text(SERIF, 10.5, ink)
                .spacing(0.0, 10.0)
                .border(Border::Bottom { width_pt: 2.0, color: maroon }),
        ),
        (StyleSlot::Name, SlotStyle::text(SERIF, 22.0, maroon).bold().spacing(0.0, 3.0)),
        (StyleSlot::Subtitle, SlotStyle::text(SERIF, 12.0, ink).spacing(0.0, 2.0)),
        (StyleSlot::ContactLine, SlotStyle::text(SERIF, 9.5, muted).spacing(0.0, 4.0)),
        (
            StyleSlot::SectionWrapper,
            SlotStyle::text(SERIF, 10.5, ink).spacing(10.0, 4.0).avoid_break_inside(),
        ),
        (
            StyleSlot::SectionTitle,
            SlotStyle::text(SERIF, 13.0, maroon)
                .bold()
                .spacing(4.0, 4.0)
                .border(Border::Bottom { width_pt: 0.5, color: maroon }),
        ),
        (StyleSlot::ItemWrapper, SlotStyle::text(SERIF, 10.5, ink).spacing(0.0, 5.0)),
        (StyleSlot::ItemTitle, SlotStyle::text(SERIF, 10.5, ink).bold()),
        (StyleSlot::ItemSubtitle, SlotStyle::text(SERIF, 10.0, muted).italic()),
        (StyleSlot::ItemDetail, SlotStyle::text(SERIF, 9.5, ink)),
        (
            StyleSlot::Table,
            SlotStyle::text(SERIF, 9.5, ink)
                .spacing(4.0, 8.0)
                .border(Border::All { width_pt: 0.5, color: Color(0x9CA3AF) }),
        ),
        (
            StyleSlot::TableHeaderCell,
            SlotStyle::text(SERIF, 9.5, Color::WHITE).bold().background(maroon),
        ),
        (StyleSlot::TableCell, SlotStyle::text(SERIF, 9.5, ink)),
        (
            StyleSlot::PublicationEntry,
            SlotStyle::text(SERIF, 10.0, ink).spacing(0.0, 4.0),
        ),
    ]
}
