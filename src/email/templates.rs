use crate::models::Estado;

/// Minimal escaping for values interpolated into HTML bodies.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

pub fn render_request_notification(user_name: &str, base_url: &str) -> String {
    let user_name = escape_html(user_name);
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="font-family: sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
    <h2>Nueva solicitud pendiente</h2>
    <p><strong>{user_name}</strong> ha enviado una solicitud que requiere revisión.</p>
    <p><a href="{base_url}" style="display: inline-block; padding: 10px 20px; background: #0f766e; color: white; text-decoration: none; border-radius: 4px;">Ir al portal</a></p>
</body>
</html>"#
    )
}

pub fn render_request_decided(name: &str, kind: &str, estado: Estado, base_url: &str) -> String {
    let name = escape_html(name);
    let kind = escape_html(kind);
    let color = match estado {
        Estado::Aprobado => "#15803d",
        Estado::Rechazado => "#b91c1c",
        Estado::Pendiente => "#a16207",
    };
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="font-family: sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
    <h2>Actualización de tu solicitud</h2>
    <p>Hola {name},</p>
    <p>Tu solicitud de <strong>{kind}</strong> fue <strong style="color: {color};">{estado}</strong>.</p>
    <p><a href="{base_url}" style="display: inline-block; padding: 10px 20px; background: #0f766e; color: white; text-decoration: none; border-radius: 4px;">Ver detalles</a></p>
</body>
</html>"#
    )
}
