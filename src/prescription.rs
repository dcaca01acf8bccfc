//! Printable prescription: renders a completed appointment's eForm as
//! plain text (for the browser print view) and as an A4 PDF.

use printpdf::*;
use std::io::BufWriter;
use thiserror::Error;

use crate::models::{Appointment, EForm};

#[derive(Debug, Error)]
pub enum PrintError {
    #[error("PDF rendering failed: {0}")]
    Pdf(String),
}

fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Plain-text layout of the prescription, one section per eForm field.
pub fn render_text(appointment: &Appointment, eform: &EForm) -> String {
    let mut out = String::new();
    let doctor = &appointment.doctor_snapshot;

    out.push_str("PRESCRIPTION\n");
    out.push_str(&format!("Dr. {} — {}\n", doctor.name, doctor.speciality));
    out.push_str(&format!(
        "Visit: {} at {}\n\n",
        appointment.slot_date.date().format("%d %b %Y"),
        appointment.slot_time
    ));

    out.push_str(&format!(
        "Patient: {} ({}, {})\n",
        eform.patient.name, eform.patient.age, eform.patient.gender
    ));
    if !eform.patient.contact.is_empty() {
        out.push_str(&format!("Contact: {}\n", eform.patient.contact));
    }
    out.push('\n');

    let sections = [
        ("Chief Complaint", &eform.chief_complaint),
        ("Clinical Notes", &eform.clinical_notes),
        ("Diagnosis", &eform.diagnosis),
    ];
    for (label, value) in sections {
        if !value.is_empty() {
            out.push_str(&format!("{label}:\n{value}\n\n"));
        }
    }

    let vitals = &eform.vitals;
    if [&vitals.blood_pressure, &vitals.pulse, &vitals.temperature, &vitals.weight]
        .iter()
        .any(|v| !v.is_empty())
    {
        out.push_str("Vitals:\n");
        out.push_str(&format!(
            "  BP: {}  Pulse: {}  Temp: {}  Weight: {}\n\n",
            vitals.blood_pressure, vitals.pulse, vitals.temperature, vitals.weight
        ));
    }

    if !eform.prescriptions.is_empty() {
        out.push_str("Medications:\n");
        for (i, line) in eform.prescriptions.iter().enumerate() {
            out.push_str(&format!(
                "  {}. {} {} — {} — {} — {}",
                i + 1,
                line.medicine,
                line.form,
                line.dosage,
                line.frequency,
                line.duration
            ));
            if !line.notes.is_empty() {
                out.push_str(&format!(" ({})", line.notes));
            }
            out.push('\n');
        }
        out.push('\n');
    }

    if !eform.tests.is_empty() {
        out.push_str(&format!("Investigations:\n{}\n\n", eform.tests));
    }
    if !eform.advice.is_empty() {
        out.push_str(&format!("Advice / Follow-up:\n{}\n", eform.advice));
    }

    out
}

/// Renders the prescription as an A4 PDF. Returns PDF bytes.
pub fn render_pdf(appointment: &Appointment, eform: &EForm) -> Result<Vec<u8>, PrintError> {
    let (doc, page1, layer1) = PdfDocument::new("Prescription", Mm(210.0), Mm(297.0), "Layer 1");
    let layer = doc.get_page(page1).get_layer(layer1);
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| PrintError::Pdf(format!("font error: {e}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| PrintError::Pdf(format!("font error: {e}")))?;

    let doctor = &appointment.doctor_snapshot;
    let mut y = Mm(280.0);

    layer.use_text("PRESCRIPTION", 14.0, Mm(20.0), y, &bold);
    y -= Mm(7.0);
    layer.use_text(
        format!("Dr. {} — {}", doctor.name, doctor.speciality),
        10.0,
        Mm(20.0),
        y,
        &font,
    );
    y -= Mm(5.0);
    layer.use_text(
        format!(
            "Visit: {} at {}",
            appointment.slot_date.date().format("%d %b %Y"),
            appointment.slot_time
        ),
        9.0,
        Mm(20.0),
        y,
        &font,
    );
    y -= Mm(8.0);

    layer.use_text(
        format!(
            "Patient: {} ({}, {})  {}",
            eform.patient.name, eform.patient.age, eform.patient.gender, eform.patient.contact
        ),
        10.0,
        Mm(20.0),
        y,
        &font,
    );
    y -= Mm(8.0);

    let section = |title: &str, body: &str, y: &mut Mm| {
        if body.is_empty() {
            return;
        }
        layer.use_text(title, 11.0, Mm(20.0), *y, &bold);
        *y -= Mm(5.5);
        for line in wrap_text(body, 90) {
            layer.use_text(&line, 9.0, Mm(25.0), *y, &font);
            *y -= Mm(4.5);
        }
        *y -= Mm(3.0);
    };

    section("CHIEF COMPLAINT:", &eform.chief_complaint, &mut y);
    section("CLINICAL NOTES:", &eform.clinical_notes, &mut y);

    let vitals = &eform.vitals;
    let vitals_body = if [&vitals.blood_pressure, &vitals.pulse, &vitals.temperature, &vitals.weight]
        .iter()
        .any(|v| !v.is_empty())
    {
        format!(
            "BP {}   Pulse {}   Temp {}   Weight {}",
            vitals.blood_pressure, vitals.pulse, vitals.temperature, vitals.weight
        )
    } else {
        String::new()
    };
    section("VITALS:", &vitals_body, &mut y);

    if !eform.prescriptions.is_empty() {
        layer.use_text("MEDICATIONS:", 11.0, Mm(20.0), y, &bold);
        y -= Mm(5.5);
        for (i, line) in eform.prescriptions.iter().enumerate() {
            let text = format!(
                "{}. {} {} — {} — {} — {} {}",
                i + 1,
                line.medicine,
                line.form,
                line.dosage,
                line.frequency,
                line.duration,
                line.notes
            );
            for wrapped in wrap_text(&text, 90) {
                layer.use_text(&wrapped, 9.0, Mm(25.0), y, &font);
                y -= Mm(4.5);
            }
        }
        y -= Mm(3.0);
    }

    section("INVESTIGATIONS:", &eform.tests, &mut y);
    section("DIAGNOSIS:", &eform.diagnosis, &mut y);
    section("ADVICE / FOLLOW-UP:", &eform.advice, &mut y);

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| PrintError::Pdf(format!("save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| PrintError::Pdf(format!("buffer error: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn completed_appointment() -> (Appointment, EForm) {
        let eform = EForm {
            patient: EFormPatient {
                name: "Meena K".into(),
                age: "28".into(),
                gender: "Female".into(),
                contact: "+91 9000000001".into(),
                address: "12 Lake Road, Chennai".into(),
            },
            chief_complaint: "Fever for 3 days".into(),
            clinical_notes: "No known allergies".into(),
            vitals: Vitals {
                blood_pressure: "120/80 mmHg".into(),
                pulse: "78 bpm".into(),
                temperature: "100.2 F".into(),
                weight: "60 kg".into(),
            },
            prescriptions: vec![PrescriptionLine {
                medicine: "Tab. Paracetamol".into(),
                form: "500 mg".into(),
                dosage: "1 tablet".into(),
                frequency: "Thrice daily".into(),
                duration: "5 days".into(),
                notes: "After food".into(),
            }],
            tests: "CBC".into(),
            diagnosis: "Viral fever".into(),
            advice: "Fluids, rest.".into(),
        };
        let appt = Appointment {
            id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            doctor_id: Uuid::new_v4(),
            slot_date: SlotDate::from_token("10_8_2026").unwrap(),
            slot_time: "10:30 AM".into(),
            patient_snapshot: PatientSnapshot {
                name: "Meena K".into(),
                email: "meena@example.com".into(),
                phone: "+91 9000000001".into(),
                address_line1: String::new(),
                address_line2: String::new(),
                gender: "Female".into(),
                dob: None,
                image: String::new(),
            },
            doctor_snapshot: DoctorSnapshot {
                name: "Sabari".into(),
                speciality: "General physician".into(),
                fee: 500,
                address_line1: String::new(),
                address_line2: String::new(),
                image: String::new(),
            },
            amount: 500,
            booked_at: NaiveDate::from_ymd_opt(2026, 8, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            cancelled: false,
            payment: true,
            is_completed: true,
            eform: Some(eform.clone()),
        };
        (appt, eform)
    }

    #[test]
    fn text_rendering_includes_all_sections() {
        let (appt, eform) = completed_appointment();
        let text = render_text(&appt, &eform);
        assert!(text.contains("Dr. Sabari — General physician"));
        assert!(text.contains("Chief Complaint:"));
        assert!(text.contains("Tab. Paracetamol"));
        assert!(text.contains("Viral fever"));
        assert!(text.contains("CBC"));
        assert!(text.contains("120/80 mmHg"));
    }

    #[test]
    fn empty_sections_are_skipped() {
        let (appt, mut eform) = completed_appointment();
        eform.tests.clear();
        eform.advice.clear();
        let text = render_text(&appt, &eform);
        assert!(!text.contains("Investigations:"));
        assert!(!text.contains("Advice"));
    }

    #[test]
    fn pdf_rendering_produces_a_document() {
        let (appt, eform) = completed_appointment();
        let bytes = render_pdf(&appt, &eform).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn wrap_text_respects_width() {
        let lines = wrap_text("one two three four five six seven", 12);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.len() <= 12));
    }
}
