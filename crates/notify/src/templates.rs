//! Message bodies for the booking notifications.

use chrono::{Datelike, Utc};
use trgnexus_core::models::delivery::BookingNotice;

use crate::mailer::OutgoingEmail;

pub const PATIENT_SENDER: &str = "\"TRG Nexus\" <noreply@trgnexus.com>";
pub const THERAPIST_SENDER: &str = "\"TRG Nexus System\" <noreply@trgnexus.com>";

const PATIENT_SUBJECT: &str = "Confirmação de Agendamento - TRG Nexus";
const WHATSAPP_THERAPIST_FALLBACK: &str = "Especialista TRG";

/// Escapes text for interpolation into HTML.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn patient_confirmation(notice: &BookingNotice) -> OutgoingEmail {
    let html = format!(
        r#"
<div style="font-family: Arial, sans-serif; color: #333; max-width: 600px; margin: 0 auto;">
    <div style="background-color: #f8fafc; padding: 20px; text-align: center; border-radius: 10px 10px 0 0;">
        <h2 style="color: #0f172a; margin: 0;">Agendamento Confirmado!</h2>
    </div>
    <div style="padding: 20px; border: 1px solid #e2e8f0; border-top: none; border-radius: 0 0 10px 10px;">
        <p>Olá, <strong>{name}</strong>,</p>
        <p>Seu agendamento foi realizado com sucesso. Abaixo estão os detalhes da sua sessão:</p>

        <div style="background-color: #f1f5f9; padding: 15px; border-radius: 8px; margin: 20px 0;">
            <p style="margin: 5px 0;"><strong>Data:</strong> {date}</p>
            <p style="margin: 5px 0;"><strong>Horário:</strong> {time}</p>
            <p style="margin: 5px 0;"><strong>Terapeuta:</strong> {therapist}</p>
        </div>

        <h3>Informações Importantes</h3>
        <ul>
            <li><strong>Cancelamento:</strong> Cancelamentos devem ser feitos com pelo menos 24 horas de antecedência. Cancelamentos tardios podem estar sujeitos a uma taxa de 50% do valor da sessão.</li>
            <li><strong>Pontualidade:</strong> Recomendamos entrar na sala de espera virtual 5 minutos antes do horário agendado.</li>
            <li><strong>Ambiente:</strong> Escolha um local tranquilo, privado e com boa conexão de internet.</li>
        </ul>

        <p style="margin-top: 30px;">Se tiver dúvidas, entre em contato conosco pelo WhatsApp.</p>

        <p style="font-size: 12px; color: #64748b; margin-top: 30px; text-align: center;">
            © {year} TRG Nexus. Todos os direitos reservados.
        </p>
    </div>
</div>
"#,
        name = escape_html(&notice.name),
        date = escape_html(&notice.date),
        time = escape_html(&notice.time),
        therapist = escape_html(&notice.therapist_name),
        year = Utc::now().year(),
    );

    OutgoingEmail {
        from: PATIENT_SENDER.to_string(),
        to: notice.email.clone(),
        subject: PATIENT_SUBJECT.to_string(),
        html,
    }
}

/// New-booking alert for the therapist, or `None` when no address is known.
pub fn therapist_alert(notice: &BookingNotice, dashboard_url: &str) -> Option<OutgoingEmail> {
    let to = notice.therapist_email.clone()?;

    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Novo Agendamento</title>
</head>
<body style="font-family: 'Segoe UI', sans-serif; background-color: #f8fafc; padding: 20px;">
    <div style="max-width: 600px; margin: 0 auto; background-color: #ffffff; border-radius: 12px; box-shadow: 0 4px 6px rgba(0,0,0,0.1); overflow: hidden;">
        <div style="background-color: #3b82f6; padding: 24px; text-align: center;">
            <h1 style="color: #ffffff; margin: 0; font-size: 22px;">📅 Novo Agendamento Recebido</h1>
        </div>
        <div style="padding: 32px;">
            <p style="color: #334155; font-size: 16px;">Olá, <strong>{therapist}</strong>!</p>
            <p style="color: #334155;">Você tem um novo agendamento confirmado na sua agenda.</p>

            <div style="background-color: #eff6ff; border-left: 4px solid #3b82f6; padding: 20px; margin: 24px 0;">
                <p style="margin: 0 0 8px 0;"><strong>Cliente:</strong> {name}</p>
                <p style="margin: 0 0 8px 0;"><strong>Data:</strong> {date}</p>
                <p style="margin: 0 0 8px 0;"><strong>Horário:</strong> {time}</p>
                <p style="margin: 0 0 8px 0;"><strong>Telefone:</strong> {phone}</p>
                <p style="margin: 0;"><strong>Queixa:</strong> {complaint}</p>
            </div>

            <div style="text-align: center; margin-top: 32px;">
                <a href="{dashboard}" style="background-color: #3b82f6; color: #ffffff; padding: 12px 24px; text-decoration: none; border-radius: 8px; font-weight: 600;">
                    Ver na Minha Agenda
                </a>
            </div>
        </div>
    </div>
</body>
</html>
"#,
        therapist = escape_html(&notice.therapist_name),
        name = escape_html(&notice.name),
        date = escape_html(&notice.date),
        time = escape_html(&notice.time),
        phone = escape_html(notice.phone.as_deref().unwrap_or("Não informado")),
        complaint = escape_html(&notice.main_complaint),
        dashboard = escape_html(dashboard_url),
    );

    Some(OutgoingEmail {
        from: THERAPIST_SENDER.to_string(),
        to,
        subject: format!("📅 Novo Agendamento: {}", notice.name),
        html,
    })
}

pub fn whatsapp_confirmation(notice: &BookingNotice) -> String {
    let therapist = if notice.therapist_name.trim().is_empty() {
        WHATSAPP_THERAPIST_FALLBACK
    } else {
        notice.therapist_name.as_str()
    };

    format!(
        "Olá {}, seu agendamento na TRG Nexus está confirmado! ✅\n\n📅 Data: {}\n⏰ Horário: {}\n👨‍⚕️ Terapeuta: {}\n\nRecomendamos entrar 5 minutos antes. Em caso de dúvidas, responda esta mensagem.",
        notice.name, notice.date, notice.time, therapist
    )
}
