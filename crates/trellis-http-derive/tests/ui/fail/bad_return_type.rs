use trellis_http::resource;

#[derive(Default)]
struct Reports;

#[resource("/reports")]
impl Reports {
    #[get]
    fn render(&self, ctx: &mut trellis_http::HttpContext) -> String {
        ctx.request.path_info().to_string()
    }
}

fn main() {
    let _ = Reports;
}
